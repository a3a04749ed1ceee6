use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Collection holding legal-document text chunks.
pub const LEGAL_CHUNK_CLASS: &str = "LegalDocumentChunk";

/// Vectorizer module producing multilingual text embeddings.
pub const MULTILINGUAL_VECTORIZER: &str = "text2vec-multilingual";

// ---------------------------------------------------------------------------
// Property model
// ---------------------------------------------------------------------------

/// Weaviate property data types used by the LexVault schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "int")]
    Int,
}

/// One property of a collection.
///
/// Weaviate represents the data type as a one-element array on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: Vec<DataType>,
}

impl Property {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type: vec![data_type],
        }
    }
}

/// Multi-tenancy flag as Weaviate reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiTenancyConfig {
    #[serde(default)]
    pub enabled: bool,
}

// ---------------------------------------------------------------------------
// SchemaDefinition
// ---------------------------------------------------------------------------

/// The collection definition this tool provisions.
///
/// Constructed once via [`SchemaDefinition::legal_document_chunk`] and
/// passed into the provisioning procedure; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub class: String,
    pub properties: Vec<Property>,
    pub vectorizer: String,
    pub multi_tenancy: bool,
}

impl SchemaDefinition {
    /// The fixed LexVault chunk schema: `content` and `documentId` text
    /// properties plus an integer `pageNumber`, multilingual vectorizer,
    /// multi-tenancy enabled.
    pub fn legal_document_chunk() -> Self {
        Self {
            class: LEGAL_CHUNK_CLASS.to_string(),
            properties: vec![
                Property::new("content", DataType::Text),
                Property::new("documentId", DataType::Text),
                Property::new("pageNumber", DataType::Int),
            ],
            vectorizer: MULTILINGUAL_VECTORIZER.to_string(),
            multi_tenancy: true,
        }
    }

    /// Body for `POST /v1/schema`.
    pub fn to_create_payload(&self) -> Value {
        json!({
            "class": self.class,
            "properties": self.properties,
            "vectorizer": self.vectorizer,
            "multiTenancyConfig": { "enabled": self.multi_tenancy },
        })
    }
}

// ---------------------------------------------------------------------------
// SchemaConfig
// ---------------------------------------------------------------------------

/// Resolved collection configuration as returned by the schema catalog.
///
/// Read back for reporting and verification only; unknown server-side
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    pub class: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub vectorizer: String,
    #[serde(default)]
    pub multi_tenancy_config: MultiTenancyConfig,
}

impl SchemaConfig {
    /// Multi-line human-readable rendering for status output.
    pub fn describe(&self) -> String {
        let mut out = format!("class: {}\n", self.class);
        out.push_str(&format!("vectorizer: {}\n", self.vectorizer));
        out.push_str(&format!(
            "multi-tenancy: {}\n",
            if self.multi_tenancy_config.enabled {
                "enabled"
            } else {
                "disabled"
            }
        ));
        out.push_str("properties:\n");
        for prop in &self.properties {
            let types: Vec<String> = prop
                .data_type
                .iter()
                .map(|t| match t {
                    DataType::Text => "text".to_string(),
                    DataType::Int => "int".to_string(),
                })
                .collect();
            out.push_str(&format!("  {} [{}]\n", prop.name, types.join(", ")));
        }
        out
    }
}
