//! Ledgerview report server
//!
//! Loads a ledger snapshot and serves profit and loss statements over HTTP.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerview_api::{AppState, create_router};
use ledgerview_core::ledger::LedgerSnapshot;
use ledgerview_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerview=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let snapshot = LedgerSnapshot::from_path(&config.ledger.snapshot_path)
        .with_context(|| format!("Failed to load ledger snapshot {}", config.ledger.snapshot_path))?;
    info!(
        path = %config.ledger.snapshot_path,
        companies = snapshot.companies.len(),
        accounts = snapshot.accounts.len(),
        postings = snapshot.postings.len(),
        "Ledger snapshot loaded"
    );

    let state = AppState::from_snapshot(snapshot, config.report.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
