use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_shared::ApiKeyGate;
use triage_core::{ConfigValues, CoreConfig, TriageService};

/// Main entry point for the triage intake service
///
/// Resolves configuration once, loads the reference data and model, opens the case store
/// and serves the REST API. Any failure while loading the scorer or classifier aborts
/// startup before the listener is bound.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TRIAGE_DB_PATH`: SQLite database file (default: "triage.db")
/// - `TRIAGE_SCORER`: `weighted` or `count` (default: `weighted`)
/// - `TRIAGE_WEIGHTS_PATH`: symptom weight table (default: "data/symptom_weights.csv")
/// - `TRIAGE_CLASSIFIER`: `threshold` or `learned` (default: `threshold`)
/// - `TRIAGE_MODEL_PATH`: model artifact, required for the learned classifier
/// - `TRIAGE_API_KEY`: doctor API key for the queue endpoints
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("triage_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = CoreConfig::resolve(ConfigValues::from_env())?;
    let gate = ApiKeyGate::from_env_value(std::env::var("TRIAGE_API_KEY").ok());
    let service = match TriageService::from_config(&config, Arc::new(gate)) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            return Err(e.into());
        }
    };

    tracing::info!(
        tiers = service.tiers().count(),
        "++ Starting triage REST on {}",
        rest_addr
    );

    let app = api_rest::router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutting down");
}
