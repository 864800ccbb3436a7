pub mod articles;
pub mod dashboards;
pub mod health;
pub mod openapi;
pub mod schemas;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use glimpse_blog::{BlogService, SuggestionService};
use glimpse_ingest::IngestPipeline;
use glimpse_render::DashboardExporter;

use crate::auth::{self, IdentityProvider};

use self::openapi::ApiDoc;

/// Request body cap. Kept above the per-file intake limit plus multipart
/// overhead so an oversize file reaches intake validation and gets a
/// per-file outcome instead of a transport-level error.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The upload-to-dashboard pipeline.
    pub pipeline: IngestPipeline,
    /// Blog CRUD and publish control.
    pub blog: BlogService,
    /// AI article metadata suggestions.
    pub suggestions: SuggestionService,
    /// Dashboard document rendering.
    pub exporter: Arc<DashboardExporter>,
    /// Bearer token resolution.
    pub identity: Arc<dyn IdentityProvider>,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        // Health (always public)
        .route("/health", get(health::health))
        // Public blog reads
        .route("/v1/articles", get(articles::list_published))
        .route("/v1/articles/{id}", get(articles::get_published));

    let user = Router::new()
        // Dashboards
        .route(
            "/v1/dashboards",
            post(dashboards::upload).get(dashboards::list),
        )
        .route("/v1/dashboards/{id}", get(dashboards::get))
        .route("/v1/dashboards/{id}/export", get(dashboards::export))
        // Quota
        .route("/v1/quota", get(dashboards::quota))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    let admin = Router::new()
        // Blog management
        .route(
            "/v1/admin/articles",
            get(articles::list_all).post(articles::create),
        )
        .route("/v1/admin/articles/suggest", post(articles::suggest))
        .route(
            "/v1/admin/articles/{id}",
            put(articles::update).delete(articles::delete),
        )
        .route("/v1/admin/articles/{id}/publish", post(articles::publish))
        .route(
            "/v1/admin/articles/{id}/unpublish",
            post(articles::unpublish),
        )
        // Admin check runs after authentication (layers run bottom-up)
        .layer(middleware::from_fn(auth::require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    Router::new()
        .merge(public)
        .merge(user)
        .merge(admin)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
