//! Authgate gateway binary.
//!
//! Composition root: wires the store, token service, strategies,
//! composers, and router in dependency order, then serves.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate_core::{CredentialStore, TokenService};
use authgate_gateway::{create_router, AppState, Args, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from_args(&args).map_err(anyhow::Error::msg)?;

    info!(
        listen = %config.listen_addr,
        data_path = %config.data_path.display(),
        token_ttl = ?config.token_ttl,
        "Starting authgate gateway"
    );

    // Open the credential database
    let db = sled::Config::new().path(&config.data_path).open()?;
    let store = Arc::new(CredentialStore::open(&db)?.with_op_timeout(config.store_timeout));
    info!(credentials = store.len(), "Credential store opened");

    // Token service with the process-wide signing secret
    let mut tokens = TokenService::new(&config.jwt_secret);
    if let Some(ttl) = config.token_ttl {
        tokens = tokens.with_ttl(ttl);
    }

    // Wire strategies and composers, then the router
    let state = AppState::new(store, Arc::new(tokens));
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
