use std::env;
use std::process::ExitCode;

use lexvault_weaviate::{
    provision_session, resolve_target, ProvisionOutcome, SchemaDefinition, WeaviateSession,
};

/// Endpoint used when WEAVIATE_URL is not set.
const DEFAULT_WEAVIATE_URL: &str = "http://127.0.0.1:8080";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let endpoint =
        env::var("WEAVIATE_URL").unwrap_or_else(|_| DEFAULT_WEAVIATE_URL.to_string());
    let definition = SchemaDefinition::legal_document_chunk();

    println!(
        "Ensuring collection '{}' exists at {endpoint}",
        definition.class
    );

    let target = match resolve_target(&endpoint) {
        Ok(target) => target,
        Err(err) => {
            println!("Provisioning failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Connecting to Weaviate at {target}");
    let session = match WeaviateSession::open(&target).await {
        Ok(session) => session,
        Err(err) => {
            println!("Provisioning failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Successfully connected.");

    match provision_session(Box::new(session), &definition).await {
        Ok(ProvisionOutcome::AlreadyExists(config)) => {
            println!("Collection '{}' already exists.", config.class);
            print!("{}", config.describe());
            ExitCode::SUCCESS
        }
        Ok(ProvisionOutcome::Created(config)) => {
            println!("Collection '{}' created successfully.", config.class);
            print!("{}", config.describe());
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Provisioning failed: {err}");
            ExitCode::FAILURE
        }
    }
}
