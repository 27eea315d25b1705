use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::detect::detect_handler;
use crate::vision::DetectionPipeline;

#[derive(Clone)]
pub struct AppState {
    /// The detection pipeline, constructed once at startup. Requests share
    /// it read-only; there is no other cross-request state.
    pub pipeline: Arc<DetectionPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<DetectionPipeline>) -> Self {
        Self { pipeline }
    }
}

/// Build the application router. Split out from [`start_server`] so tests
/// can drive it in-process with `tower::ServiceExt`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Detection endpoint
        .route("/detect", post(detect_handler))
        // Health check
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(
    addr: SocketAddr,
    pipeline: Arc<DetectionPipeline>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    axum::response::Json(json!({
        "status": "ok",
        "mode": state.pipeline.mode().as_str(),
        "version": crate::version::VERSION_NUMBER,
    }))
}
