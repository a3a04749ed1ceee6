use crate::catalog::{CatalogSession, WeaviateSession};
use crate::endpoint::resolve_target;
use crate::schema::{SchemaConfig, SchemaDefinition};
use crate::ProvisionError;

// ---------------------------------------------------------------------------
// ProvisionOutcome
// ---------------------------------------------------------------------------

/// Result of a successful provisioning run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
    /// The collection was already present; nothing was created.
    AlreadyExists(SchemaConfig),
    /// The collection was created on this run.
    Created(SchemaConfig),
}

impl ProvisionOutcome {
    /// The reported collection configuration, whichever branch was taken.
    pub fn config(&self) -> &SchemaConfig {
        match self {
            Self::AlreadyExists(config) | Self::Created(config) => config,
        }
    }
}

// ---------------------------------------------------------------------------
// Provisioning procedure
// ---------------------------------------------------------------------------

/// Ensure the collection described by `definition` exists at `endpoint`.
///
/// The procedure is linear: resolve the endpoint, open a session, check
/// existence, then either report the existing configuration or create the
/// collection and report the result. Every error is terminal for the run;
/// re-running later is the only retry. The session is released exactly
/// once on every path after it opens.
pub async fn provision(
    endpoint: &str,
    definition: &SchemaDefinition,
) -> Result<ProvisionOutcome, ProvisionError> {
    let target = resolve_target(endpoint)?;
    let session = WeaviateSession::open(&target).await?;
    provision_session(Box::new(session), definition).await
}

/// Run the catalog steps over an already-open session.
///
/// Consumes the session and closes it on every exit path, success or
/// failure. Split out from [`provision`] so the procedure can run against
/// any [`CatalogSession`] implementation.
pub async fn provision_session(
    session: Box<dyn CatalogSession>,
    definition: &SchemaDefinition,
) -> Result<ProvisionOutcome, ProvisionError> {
    let outcome = run_catalog_steps(session.as_ref(), definition).await;
    session.close().await;
    outcome
}

async fn run_catalog_steps(
    session: &dyn CatalogSession,
    definition: &SchemaDefinition,
) -> Result<ProvisionOutcome, ProvisionError> {
    if session.exists(&definition.class).await? {
        tracing::info!(class = %definition.class, "collection already exists");
        let config = session.get_config(&definition.class).await?;
        return Ok(ProvisionOutcome::AlreadyExists(config));
    }

    tracing::info!(class = %definition.class, "collection absent, creating");
    session.create(definition).await?;
    let config = session.get_config(&definition.class).await?;
    Ok(ProvisionOutcome::Created(config))
}
