/// Health and metrics endpoints
use crate::{context::AppContext, metrics};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/metrics", get(metrics_text))
}

/// Basic health check
///
/// The resolver holds no connections or state, so being able to answer is
/// the whole check.
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus text exposition
pub async fn metrics_text() -> Response {
    match metrics::gather() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}
