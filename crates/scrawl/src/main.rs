//! Scrawl server binary.

use scrawl::{ScrawlError, ScrawlServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScrawlError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(addr = %config.addr, "starting Scrawl");

    let server = ScrawlServer::bind(&config).await?;
    server.run().await
}
