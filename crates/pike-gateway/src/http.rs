//! HTTP surface.
//!
//! Routes:
//!
//! - `POST /submit` — share + proof submission
//! - `GET /healthz` — liveness probe
//! - `GET /state` — admitted-entry snapshot
//!
//! Anything else answers 404 with a JSON error body.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

use crate::admission::AdmissionService;

/// Build the gateway router.
pub fn router(service: Arc<AdmissionService>) -> Router {
    Router::new()
        .route("/submit", post(submit))
        .route("/healthz", get(healthz))
        .route("/state", get(state))
        .fallback(not_found)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(service)
}

/// Submit one share with its proof reference.
async fn submit(State(service): State<Arc<AdmissionService>>, body: Bytes) -> impl IntoResponse {
    let (status, payload) = service.submit(&body).await;
    (status, Json(payload))
}

/// Liveness probe.
async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Read-only ledger snapshot.
async fn state(State(service): State<Arc<AdmissionService>>) -> impl IntoResponse {
    Json(service.state())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
