use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use glimpse_ingest::IngestMetricsSnapshot;

use super::AppState;
use super::schemas::{HealthResponse, IngestMetricsResponse};

fn build_metrics_response(snap: &IngestMetricsSnapshot) -> IngestMetricsResponse {
    IngestMetricsResponse {
        received: snap.received,
        created: snap.created,
        rejected: snap.rejected,
        quota_blocked: snap.quota_blocked,
        failed: snap.failed,
    }
}

/// `GET /health` -- returns service status together with pipeline counters.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Returns service status and a snapshot of upload pipeline counters.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(clippy::unused_async)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let snap = state.pipeline.metrics().snapshot();

    let body = HealthResponse {
        status: "ok".into(),
        metrics: build_metrics_response(&snap),
    };

    (StatusCode::OK, Json(body))
}
