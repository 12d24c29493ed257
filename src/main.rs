use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use flycast::config::FlycastConfig;
use flycast::{cache, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = FlycastConfig::load()?;

    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cache_path = config.cache.expanded_location();
    cache::init(&cache_path)
        .with_context(|| format!("Failed to open cache database at {}", cache_path.display()))?;

    tracing::info!(
        version = flycast::VERSION,
        port = config.server.port,
        "Starting flycast"
    );

    web::run(config).await
}
