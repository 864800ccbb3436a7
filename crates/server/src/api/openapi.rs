#![allow(clippy::needless_for_each)]

use glimpse_core::{
    ArticleSuggestion, BlogArticle, ChartKind, ChartSpec, DashboardArtifact, DataPoint, MetricSpec,
    UploadQuota,
};

use super::articles::{CreateArticleRequest, SuggestRequest, UpdateArticleRequest};
use super::dashboards::{UploadOutcomeResponse, UploadStatus};
use super::schemas::{ErrorResponse, HealthResponse, IngestMetricsResponse};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Glimpse API",
        version = "0.1.0",
        description = "HTTP API for the Glimpse dashboard service. Upload data files for AI analysis, browse the generated dashboards, and manage the editorial blog.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health and pipeline counters"),
        (name = "Dashboards", description = "File upload, AI-generated dashboards, and export"),
        (name = "Articles", description = "Editorial blog management and public reading")
    ),
    paths(
        super::health::health,
        super::dashboards::upload,
        super::dashboards::list,
        super::dashboards::get,
        super::dashboards::export,
        super::dashboards::quota,
        super::articles::list_published,
        super::articles::get_published,
        super::articles::list_all,
        super::articles::create,
        super::articles::suggest,
        super::articles::update,
        super::articles::publish,
        super::articles::unpublish,
        super::articles::delete,
    ),
    components(schemas(
        HealthResponse, IngestMetricsResponse, ErrorResponse,
        DashboardArtifact, ChartSpec, ChartKind, DataPoint, MetricSpec,
        UploadQuota, UploadOutcomeResponse, UploadStatus,
        BlogArticle, ArticleSuggestion,
        CreateArticleRequest, UpdateArticleRequest, SuggestRequest,
    ))
)]
pub struct ApiDoc;
