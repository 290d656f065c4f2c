//! HTTP API server for the credverify node.
//!
//! A thin boundary over [`VerificationService`]: it decodes the request body,
//! hands it to the service, and maps `success == false` to HTTP 400.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

use credverify_core::VerificationResult;
use credverify_verifiers::{VerificationRequest, VerificationService};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_verification(
    State(service): State<Arc<VerificationService>>,
    Json(req): Json<VerificationRequest>,
) -> (StatusCode, Json<VerificationResult>) {
    let result = service.verify(req).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(result))
}

pub fn build_router(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/verification", post(handle_verification))
        .with_state(service)
}

pub async fn start_api_server(
    listen_addr: SocketAddr,
    service: Arc<VerificationService>,
) -> anyhow::Result<()> {
    let app = build_router(service);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
