use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexvault_weaviate::{
    provision, provision_session, CatalogSession, MultiTenancyConfig, ProvisionError,
    ProvisionOutcome, SchemaConfig, SchemaDefinition,
};

// ---------------------------------------------------------------------------
// Fake catalog session
// ---------------------------------------------------------------------------

/// Which step should fail, if any.
#[derive(Clone, Copy, PartialEq)]
enum Inject {
    Nothing,
    ExistsFails,
    GetConfigFails,
    CreateFails,
}

/// Shared catalog state so consecutive runs observe each other's writes,
/// plus call counters for the release and idempotence assertions.
struct FakeCatalog {
    classes: Mutex<HashMap<String, SchemaConfig>>,
    inject: Inject,
    exists_calls: AtomicUsize,
    create_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

impl FakeCatalog {
    fn new(inject: Inject) -> Arc<Self> {
        Arc::new(Self {
            classes: Mutex::new(HashMap::new()),
            inject,
            exists_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
        })
    }

    fn with_existing(definition: &SchemaDefinition) -> Arc<Self> {
        let catalog = Self::new(Inject::Nothing);
        catalog
            .classes
            .lock()
            .unwrap()
            .insert(definition.class.clone(), config_of(definition));
        catalog
    }

    fn session(self: &Arc<Self>) -> Box<dyn CatalogSession> {
        Box::new(FakeSession {
            catalog: Arc::clone(self),
        })
    }
}

fn config_of(definition: &SchemaDefinition) -> SchemaConfig {
    SchemaConfig {
        class: definition.class.clone(),
        properties: definition.properties.clone(),
        vectorizer: definition.vectorizer.clone(),
        multi_tenancy_config: MultiTenancyConfig {
            enabled: definition.multi_tenancy,
        },
    }
}

struct FakeSession {
    catalog: Arc<FakeCatalog>,
}

#[async_trait]
impl CatalogSession for FakeSession {
    async fn exists(&self, class: &str) -> Result<bool, ProvisionError> {
        self.catalog.exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.catalog.inject == Inject::ExistsFails {
            return Err(ProvisionError::Query("injected: exists failed".into()));
        }
        Ok(self.catalog.classes.lock().unwrap().contains_key(class))
    }

    async fn get_config(&self, class: &str) -> Result<SchemaConfig, ProvisionError> {
        if self.catalog.inject == Inject::GetConfigFails {
            return Err(ProvisionError::Query("injected: get_config failed".into()));
        }
        self.catalog
            .classes
            .lock()
            .unwrap()
            .get(class)
            .cloned()
            .ok_or_else(|| ProvisionError::Query(format!("class '{class}' not found")))
    }

    async fn create(&self, definition: &SchemaDefinition) -> Result<(), ProvisionError> {
        self.catalog.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.catalog.inject == Inject::CreateFails {
            return Err(ProvisionError::Creation("injected: create rejected".into()));
        }
        let mut classes = self.catalog.classes.lock().unwrap();
        if classes.contains_key(&definition.class) {
            return Err(ProvisionError::Creation(format!(
                "class '{}' already exists",
                definition.class
            )));
        }
        classes.insert(definition.class.clone(), config_of(definition));
        Ok(())
    }

    async fn close(self: Box<Self>) {
        self.catalog.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn absent_collection_is_created_once_with_the_fixed_definition() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::new(Inject::Nothing);

    let outcome = provision_session(catalog.session(), &definition)
        .await
        .unwrap();

    let ProvisionOutcome::Created(config) = outcome else {
        panic!("expected Created outcome");
    };
    assert_eq!(config, config_of(&definition));
    assert!(config.multi_tenancy_config.enabled);
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.close_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn present_collection_is_reported_without_a_create_call() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::with_existing(&definition);

    let outcome = provision_session(catalog.session(), &definition)
        .await
        .unwrap();

    assert_eq!(outcome, ProvisionOutcome::AlreadyExists(config_of(&definition)));
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(catalog.close_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn two_runs_create_exactly_once_and_agree_on_config() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::new(Inject::Nothing);

    let first = provision_session(catalog.session(), &definition)
        .await
        .unwrap();
    let second = provision_session(catalog.session(), &definition)
        .await
        .unwrap();

    assert!(matches!(first, ProvisionOutcome::Created(_)));
    let ProvisionOutcome::AlreadyExists(config) = second else {
        panic!("second run must report already-exists");
    };
    assert_eq!(&config, first.config());
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.close_calls.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Failure paths: session released exactly once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_existence_check_still_releases_the_session() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::new(Inject::ExistsFails);

    let err = provision_session(catalog.session(), &definition)
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Query(_)), "{err}");
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(catalog.close_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_config_fetch_still_releases_the_session() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::new(Inject::GetConfigFails);

    let err = provision_session(catalog.session(), &definition)
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Query(_)), "{err}");
    assert_eq!(catalog.close_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_creation_still_releases_the_session() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::new(Inject::CreateFails);

    let err = provision_session(catalog.session(), &definition)
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Creation(_)), "{err}");
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.close_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn creation_race_surfaces_as_a_creation_error() {
    let definition = SchemaDefinition::legal_document_chunk();
    let catalog = FakeCatalog::new(Inject::Nothing);

    // Another provisioner wins between our existence check and create.
    let session = catalog.session();
    catalog
        .classes
        .lock()
        .unwrap()
        .insert(definition.class.clone(), config_of(&definition));
    let racing = FakeSession {
        catalog: Arc::clone(&catalog),
    };
    let err = racing.create(&definition).await.unwrap_err();
    assert!(matches!(err, ProvisionError::Creation(_)), "{err}");
    session.close().await;
}

#[tokio::test]
async fn unreachable_endpoint_is_a_connection_error() {
    let definition = SchemaDefinition::legal_document_chunk();

    // Port 1 on loopback: connection refused before any catalog call.
    let err = provision("http://127.0.0.1:1", &definition)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Connection(_)), "{err}");
}

#[tokio::test]
async fn malformed_endpoint_fails_before_any_session_is_opened() {
    let definition = SchemaDefinition::legal_document_chunk();

    let err = provision("not-a-url", &definition).await.unwrap_err();
    assert!(matches!(err, ProvisionError::Config(_)), "{err}");

    let err = provision("http://:8080", &definition).await.unwrap_err();
    assert!(matches!(err, ProvisionError::Config(_)), "{err}");
}

// ---------------------------------------------------------------------------
// Integration tests — require a running Weaviate instance.
// Run with: cargo test -p lexvault-weaviate -- --ignored
// ---------------------------------------------------------------------------

mod integration {
    use super::*;

    #[tokio::test]
    #[ignore = "requires running Weaviate instance at localhost:8080"]
    async fn provision_against_local_instance_is_idempotent() {
        let definition = SchemaDefinition::legal_document_chunk();

        let first = provision("http://localhost:8080", &definition)
            .await
            .expect("first provisioning run failed");
        let second = provision("http://127.0.0.1:8080", &definition)
            .await
            .expect("second provisioning run failed");

        assert!(matches!(second, ProvisionOutcome::AlreadyExists(_)));
        let config = second.config();
        assert_eq!(config.class, "LegalDocumentChunk");
        assert_eq!(config.properties.len(), 3);
        assert!(config.multi_tenancy_config.enabled);
        assert_eq!(first.config().class, config.class);
    }
}
