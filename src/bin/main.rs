use financial_query_assistant::{AssistantConfig, QueryRouter, ResponsePayload};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("Usage: ask <question>");
        eprintln!("Example: ask \"What is the latest stock price for Apple?\"");
        std::process::exit(2);
    }

    let config = AssistantConfig::from_env()?;
    let router = QueryRouter::from_config(&config)?;

    info!(query = %query, "Asking");
    let reply = router.ask(&query).await;

    match reply.payload {
        ResponsePayload::Answer(text) => {
            println!("{}", text);
            Ok(())
        }
        ResponsePayload::Error { code, message } => {
            eprintln!("Error ({:?}): {}", code, message);
            std::process::exit(1);
        }
    }
}
