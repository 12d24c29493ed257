//! HTTP server bootstrap

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, AppState};
use crate::config::FlycastConfig;

/// Bind and serve the API until the process is stopped.
pub async fn run(config: FlycastConfig) -> Result<()> {
    let port = config.server.port;
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api::router(state))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{port}");
    axum::serve(listener, app)
        .await
        .with_context(|| "Server terminated unexpectedly")?;
    Ok(())
}
