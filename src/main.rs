use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skycast_mcp::config::AppConfig;
use skycast_mcp::geolocation::ConfiguredLocation;
use skycast_mcp::service::WeatherServer;
use skycast_mcp::{Forecaster, GeminiClient};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "skycast_mcp=info".into());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries the MCP transport, logs go to stderr
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting SkyCast MCP server");

    let config = AppConfig::from_env()?;
    tracing::info!(model = %config.gemini.model, home = config.home.is_some(), "Configuration loaded");

    let provider = GeminiClient::new(config.gemini)?;
    let server = WeatherServer::new(
        Forecaster::new(Arc::new(provider)),
        Arc::new(ConfiguredLocation::new(config.home)),
    );

    let running = server.serve(rmcp::transport::stdio()).await?;
    running.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
