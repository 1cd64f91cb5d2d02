use financial_query_assistant::{api::start_server, AssistantConfig, QueryRouter};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AssistantConfig::from_env()?;

    info!("🚀 Financial Query Assistant - API Server");
    info!("📍 Port: {}", config.port);

    let router = QueryRouter::from_config(&config)?;

    match router.oracle_error() {
        Some(reason) => {
            warn!("⚠️  Language oracle unavailable: {}", reason);
            warn!("📌 Queries will be answered with a service-unavailable error");
        }
        None => info!("✅ Query router initialized"),
    }

    info!("📡 Starting API server...");

    start_server(Arc::new(router), config.port).await?;

    Ok(())
}
