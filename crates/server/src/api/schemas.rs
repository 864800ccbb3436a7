use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
    /// Current upload pipeline counters.
    pub metrics: IngestMetricsResponse,
}

/// Upload pipeline counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestMetricsResponse {
    /// Files received by the pipeline.
    #[schema(example = 42)]
    pub received: u64,
    /// Files that produced a dashboard.
    #[schema(example = 36)]
    pub created: u64,
    /// Files turned away by intake validation.
    #[schema(example = 3)]
    pub rejected: u64,
    /// Files blocked by an exhausted daily allowance.
    #[schema(example = 2)]
    pub quota_blocked: u64,
    /// Files that failed in generation or persistence.
    #[schema(example = 1)]
    pub failed: u64,
}

/// Generic error response returned on failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    #[schema(example = "dashboard not found: 550e8400-e29b-41d4-a716-446655440000")]
    pub error: String,
}
