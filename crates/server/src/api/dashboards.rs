use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use glimpse_core::{ArtifactId, DashboardArtifact, UploadQuota};
use glimpse_ingest::{IncomingFile, IngestOutcome};
use glimpse_render::ExportFormat;

use super::AppState;
use super::schemas::ErrorResponse;
use crate::auth::AuthenticatedUser;
use crate::error::ServerError;

/// Reason string for outcomes whose real error lives in the server log.
const PROCESSING_FAILED: &str = "processing failed; the upload was not counted";

/// Status of one file in an upload batch.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// The file was analyzed and a dashboard created.
    Created,
    /// The file failed intake validation.
    Rejected,
    /// The day's upload allowance is exhausted.
    QuotaExceeded,
    /// A downstream step failed; no quota was consumed.
    Failed,
}

/// Outcome of one file in an upload batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadOutcomeResponse {
    /// Name of the uploaded file this outcome is for.
    #[schema(example = "sales_q3.csv")]
    pub file_name: String,
    /// What happened to the file.
    pub status: UploadStatus,
    /// The created dashboard. Present only for `created`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardArtifact>,
    /// Why the file produced no dashboard. Present for `rejected` and
    /// `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "unsupported file type: image/png")]
    pub reason: Option<String>,
    /// Quota snapshot at the time of the refusal. Present only for
    /// `quota_exceeded`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<UploadQuota>,
}

impl From<IngestOutcome> for UploadOutcomeResponse {
    fn from(outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Created { artifact } => Self {
                file_name: artifact.file_name.clone(),
                status: UploadStatus::Created,
                dashboard: Some(*artifact),
                reason: None,
                quota: None,
            },
            IngestOutcome::Rejected { file_name, reason } => Self {
                file_name,
                status: UploadStatus::Rejected,
                dashboard: None,
                reason: Some(reason.to_string()),
                quota: None,
            },
            IngestOutcome::QuotaExceeded { file_name, quota } => Self {
                file_name,
                status: UploadStatus::QuotaExceeded,
                dashboard: None,
                reason: None,
                quota: Some(quota),
            },
            // The pipeline already logged the underlying error; clients get
            // a stable message with no internals.
            IngestOutcome::Failed { file_name, .. } => Self {
                file_name,
                status: UploadStatus::Failed,
                dashboard: None,
                reason: Some(PROCESSING_FAILED.to_owned()),
                quota: None,
            },
        }
    }
}

/// Query parameters for listing dashboards.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardListQuery {
    /// Maximum number of dashboards to return.
    pub limit: Option<usize>,
}

/// Query parameters for exporting a dashboard.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Output format: `"svg"` (default) or `"html"`.
    pub format: Option<String>,
}

/// `POST /v1/dashboards` -- upload files and create dashboards.
#[utoipa::path(
    post,
    path = "/v1/dashboards",
    tag = "Dashboards",
    summary = "Upload files for analysis",
    description = "Accepts a multipart upload and runs each file through validation, \
                   the daily quota gate, and AI analysis. Files are processed \
                   independently; one outcome is returned per file, in upload order.",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "One outcome per file, in upload order", body = [UploadOutcomeResponse]),
        (status = 400, description = "Empty or malformed upload", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        // Form fields without a file name are not uploads; skip them.
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let data = field.bytes().await.map_err(|e| {
            ServerError::BadRequest(format!("could not read field '{file_name}': {e}"))
        })?;
        files.push(IncomingFile::new(file_name, content_type, data));
    }

    if files.is_empty() {
        return Err(ServerError::BadRequest(
            "upload contains no files".to_owned(),
        ));
    }

    let outcomes = state.pipeline.ingest_batch(&user.id, files).await;
    let body: Vec<UploadOutcomeResponse> = outcomes.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(body)))
}

/// `GET /v1/dashboards` -- list the caller's dashboards.
#[utoipa::path(
    get,
    path = "/v1/dashboards",
    tag = "Dashboards",
    summary = "List dashboards",
    description = "Returns the caller's dashboards, newest first. Never returns \
                   another user's dashboards.",
    params(DashboardListQuery),
    responses(
        (status = 200, description = "The caller's dashboards", body = [DashboardArtifact]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Query(query): Query<DashboardListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let artifacts = state
        .pipeline
        .artifacts()
        .list(&user.id, query.limit)
        .await?;
    Ok((StatusCode::OK, Json(artifacts)))
}

/// `GET /v1/dashboards/{id}` -- fetch one dashboard.
#[utoipa::path(
    get,
    path = "/v1/dashboards/{id}",
    tag = "Dashboards",
    summary = "Get dashboard details",
    description = "Returns one of the caller's dashboards by id. Another user's \
                   dashboard reads as absent.",
    params(
        ("id" = String, Path, description = "Dashboard ID"),
    ),
    responses(
        (status = 200, description = "Dashboard details", body = DashboardArtifact),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let id = ArtifactId::new(id);
    let artifact = state
        .pipeline
        .artifacts()
        .fetch(&user.id, &id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("dashboard not found: {id}")))?;
    Ok((StatusCode::OK, Json(artifact)))
}

/// `GET /v1/dashboards/{id}/export` -- export a dashboard as a document.
#[utoipa::path(
    get,
    path = "/v1/dashboards/{id}/export",
    tag = "Dashboards",
    summary = "Export a dashboard",
    description = "Renders the dashboard as a static SVG image or a paginated, \
                   print-ready HTML document. The same dashboard always exports \
                   to the same bytes.",
    params(
        ("id" = String, Path, description = "Dashboard ID"),
        ExportQuery,
    ),
    responses(
        (status = 200, description = "The rendered document"),
        (status = 400, description = "Unknown export format", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn export(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let format = match query.format.as_deref() {
        Some(s) => ExportFormat::parse(s)?,
        None => ExportFormat::Svg,
    };

    let id = ArtifactId::new(id);
    let artifact = state
        .pipeline
        .artifacts()
        .fetch(&user.id, &id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("dashboard not found: {id}")))?;

    let document = state.exporter.export(&artifact, format)?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], document))
}

/// `GET /v1/quota` -- the caller's upload allowance for today.
#[utoipa::path(
    get,
    path = "/v1/quota",
    tag = "Dashboards",
    summary = "Get today's upload quota",
    description = "Returns the caller's upload usage for the current UTC day. \
                   Reading the quota never consumes it.",
    responses(
        (status = 200, description = "Today's usage and allowance", body = UploadQuota),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn quota(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ServerError> {
    let quota = state.pipeline.quota().usage(&user.id, &Utc::now()).await?;
    Ok((StatusCode::OK, Json(quota)))
}
