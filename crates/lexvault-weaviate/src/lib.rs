//! Weaviate collection provisioning for the LexVault legal document store.
//!
//! LexVault keeps legal-document text chunks in a single multi-tenant
//! [Weaviate](https://weaviate.io/) collection with a multilingual text
//! vectorizer. This crate ensures that collection exists, idempotently:
//! it resolves an endpoint URL, opens a session, probes the schema
//! catalog, creates the `LegalDocumentChunk` class only when it is
//! absent, and reports the resulting configuration. It never mutates or
//! deletes an existing class.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use lexvault_weaviate::{provision, SchemaDefinition};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let definition = SchemaDefinition::legal_document_chunk();
//! let outcome = provision("http://127.0.0.1:8080", &definition).await?;
//! println!("{:?}", outcome.config());
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod catalog;
mod endpoint;
mod provision;
mod schema;

pub use catalog::{CatalogSession, WeaviateSession};
pub use endpoint::{resolve_target, ConnectMode, ConnectionTarget, DEFAULT_GRPC_PORT};
pub use provision::{provision, provision_session, ProvisionOutcome};
pub use schema::{
    DataType, MultiTenancyConfig, Property, SchemaConfig, SchemaDefinition, LEGAL_CHUNK_CLASS,
    MULTILINGUAL_VECTORIZER,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the provisioning procedure.
///
/// Every variant is terminal for the current run: the caller reports it and
/// re-runs the whole procedure later. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Endpoint URL malformed or missing host/port. Raised before any
    /// session is opened.
    #[error("config error: {0}")]
    Config(String),
    /// Session establishment failed (unreachable host, handshake or auth
    /// failure, instance not ready).
    #[error("connection error: {0}")]
    Connection(String),
    /// Existence check or configuration retrieval failed.
    #[error("query error: {0}")]
    Query(String),
    /// Schema creation rejected by the database, including a lost race
    /// with a concurrent provisioner.
    #[error("creation error: {0}")]
    Creation(String),
}
