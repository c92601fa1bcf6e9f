//! Cardio client - terminal front end for a cardiovascular risk service
//!
//! Submits health metrics for prediction, requests advice for the latest
//! prediction, and holds chat and voice conversations against the backend.

mod config;
mod console;
mod error;
mod gateway;
mod runtime;
mod session;
mod state_machine;

use config::ClientConfig;
use console::ConsoleSink;
use gateway::{HttpGateway, LoggingGateway};
use runtime::ProductionOrchestrator;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with console output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardio_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(
        api_base = %config.api_base,
        timeout = ?config.request_timeout,
        load_schema = config.load_schema,
        "Starting cardio client"
    );

    let gateway = LoggingGateway::new(HttpGateway::new(
        config.api_base.clone(),
        config.request_timeout,
    )?);
    let orchestrator: Arc<ProductionOrchestrator<ConsoleSink>> = Arc::new(
        runtime::Orchestrator::new(gateway, ConsoleSink::new(config.api_base.clone())),
    );
    tracing::info!(session = %orchestrator.session_id(), "Session created");

    if config.load_schema {
        match orchestrator.load_model_info().await {
            Ok(schema) => tracing::info!(features = ?schema.names(), "Model schema loaded"),
            Err(e) => tracing::warn!(error = %e, "Model schema unavailable, submitting unchecked"),
        }
    }

    console::run(orchestrator, &config.api_base).await?;
    tracing::info!("Console closed");
    Ok(())
}
