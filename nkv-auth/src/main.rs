//! Demo entrypoint: construct the client from the environment, seed the
//! default admin credential, and run a sample login.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nkv_auth::{CredentialStore, Settings};
use nkv_client::{KvClient, TracingSink};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env();
    info!(
        "starting credential store (namespace={}, default_ttl={}s)",
        settings.namespace, settings.default_ttl_seconds
    );

    let client = KvClient::new(
        settings.namespace,
        settings.default_ttl_seconds,
        settings.connection,
        Arc::new(TracingSink),
    );
    client.connect().await.context("initial connection")?;

    let store = CredentialStore::new(client);

    let seeded = store.register(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    info!("seeded admin credential: {}", seeded.message);

    let response = store.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    store.disconnect().await;
    Ok(())
}
