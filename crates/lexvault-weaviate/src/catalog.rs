use std::time::Duration;

use async_trait::async_trait;

use crate::endpoint::{ConnectMode, ConnectionTarget};
use crate::schema::{SchemaConfig, SchemaDefinition};
use crate::ProvisionError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// CatalogSession
// ---------------------------------------------------------------------------

/// An open session against a vector database schema catalog.
///
/// The provisioning procedure only ever observes presence, reads
/// configuration, and creates when absent; there is no mutation or
/// deletion surface. `close` consumes the session, so it can be released
/// exactly once per run.
#[async_trait]
pub trait CatalogSession: Send + Sync {
    /// Whether a collection with this name exists. No side effects.
    async fn exists(&self, class: &str) -> Result<bool, ProvisionError>;

    /// Resolved configuration of an existing collection.
    async fn get_config(&self, class: &str) -> Result<SchemaConfig, ProvisionError>;

    /// Create the collection exactly as defined. No retry on rejection;
    /// a creation race with another provisioner surfaces here.
    async fn create(&self, definition: &SchemaDefinition) -> Result<(), ProvisionError>;

    /// Release the session.
    async fn close(self: Box<Self>);
}

// ---------------------------------------------------------------------------
// WeaviateSession
// ---------------------------------------------------------------------------

/// [`CatalogSession`] over the Weaviate REST v1 schema API.
///
/// - Existence / configuration: `GET /v1/schema/{class}`
/// - Creation: `POST /v1/schema`
/// - Liveness at open: `GET /v1/.well-known/ready`
pub struct WeaviateSession {
    client: reqwest::Client,
    base_url: String,
    target: ConnectionTarget,
}

impl WeaviateSession {
    /// Open a session against the target and verify the instance is ready.
    ///
    /// Loopback targets use the local convenience path; anything else is
    /// treated as a custom endpoint with transport security inferred from
    /// the URL scheme. gRPC transport security stays disabled in both
    /// modes (known limitation of the current deployment setup).
    pub async fn open(target: &ConnectionTarget) -> Result<Self, ProvisionError> {
        match target.connect_mode() {
            ConnectMode::Local => {
                tracing::info!(
                    host = %target.host,
                    port = target.port,
                    grpc_port = target.grpc_port,
                    "connecting to local Weaviate instance"
                );
            }
            ConnectMode::Custom { secure } => {
                tracing::info!(
                    endpoint = %target,
                    http_secure = secure,
                    grpc_secure = false,
                    "connecting to custom Weaviate instance"
                );
            }
        }

        let session = Self::new(target)?;
        session.ready_check().await?;
        Ok(session)
    }

    /// Build the session without touching the network.
    fn new(target: &ConnectionTarget) -> Result<Self, ProvisionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProvisionError::Connection(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: target.base_url(),
            target: target.clone(),
        })
    }

    /// The target this session was opened against.
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    fn class_url(&self, class: &str) -> String {
        format!("{}/v1/schema/{class}", self.base_url)
    }

    async fn ready_check(&self) -> Result<(), ProvisionError> {
        let url = format!("{}/v1/.well-known/ready", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProvisionError::Connection(format!("reaching {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProvisionError::Connection(format!(
                "Weaviate at {} not ready (HTTP {})",
                self.base_url,
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSession for WeaviateSession {
    async fn exists(&self, class: &str) -> Result<bool, ProvisionError> {
        let url = self.class_url(class);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProvisionError::Query(format!("existence check for '{class}': {e}")))?;

        match resp.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(ProvisionError::Query(format!(
                    "existence check for '{class}' (HTTP {status}): {body}"
                )))
            }
        }
    }

    async fn get_config(&self, class: &str) -> Result<SchemaConfig, ProvisionError> {
        let url = self.class_url(class);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProvisionError::Query(format!("fetching config for '{class}': {e}")))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProvisionError::Query(format!(
                "fetching config for '{class}' (HTTP {status}): {body}"
            )));
        }

        resp.json::<SchemaConfig>()
            .await
            .map_err(|e| ProvisionError::Query(format!("parsing config for '{class}': {e}")))
    }

    async fn create(&self, definition: &SchemaDefinition) -> Result<(), ProvisionError> {
        let url = format!("{}/v1/schema", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&definition.to_create_payload())
            .send()
            .await
            .map_err(|e| {
                ProvisionError::Creation(format!("creating '{}': {e}", definition.class))
            })?;

        let status = resp.status().as_u16();
        if status != 200 {
            // 422 covers both a rejected definition and a creation race.
            let body = resp.text().await.unwrap_or_default();
            return Err(ProvisionError::Creation(format!(
                "creating '{}' (HTTP {status}): {body}",
                definition.class
            )));
        }

        tracing::debug!(class = %definition.class, "collection created");
        Ok(())
    }

    async fn close(self: Box<Self>) {
        // reqwest pools connections internally; dropping the client is the
        // release. Kept explicit so every exit path goes through one place.
        tracing::debug!(endpoint = %self.base_url, "session closed");
    }
}
