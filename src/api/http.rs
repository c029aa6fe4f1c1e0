//! HTTP server setup with Axum

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{battles, players, stats};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/battles", get(battles::list_battles))
        .route("/api/battles/:id", get(battles::get_battle))
        .route("/api/stats/daily", get(stats::daily))
        .route("/api/stats/summary", get(stats::summary))
        .route("/api/guild", get(stats::guild))
        .route("/api/enemies", get(stats::enemies))
        .route("/api/players/top", get(players::top))
        .route("/api/attendance", get(players::attendance))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("HTTP_LISTENING addr={}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await
}

async fn health_check() -> &'static str {
    "OK"
}
