use slack_order_bot::{OrderBotConfig, serve};
use slack_order_bot::env::SystemEnv;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = OrderBotConfig::from_env(&SystemEnv)?;
    serve(config).await
}
