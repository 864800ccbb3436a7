use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use glimpse_blog::{ArticleFilter, ArticleUpdate};
use glimpse_core::{ArticleId, ArticleSuggestion, BlogArticle};

use super::AppState;
use super::schemas::ErrorResponse;
use crate::auth::AuthenticatedUser;
use crate::error::ServerError;

/// Request body for creating an article.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArticleRequest {
    /// Article title.
    #[schema(example = "Quarterly data deep dive")]
    pub title: String,
    /// Rich/HTML body. Sanitized before persistence.
    #[schema(example = "<p>Our numbers this quarter...</p>")]
    pub content: String,
    /// Tags for listings and search.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for updating an article. Omitted fields keep their
/// current value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateArticleRequest {
    /// New title.
    pub title: Option<String>,
    /// New body. Sanitized before persistence.
    pub content: Option<String>,
    /// New summary.
    pub summary: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

/// Request body for requesting AI article metadata.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestRequest {
    /// Draft article content to derive metadata from.
    #[schema(example = "<p>Our numbers this quarter...</p>")]
    pub content: String,
}

/// Query parameters for article listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ArticleListQuery {
    /// Maximum number of articles to return.
    pub limit: Option<usize>,
}

/// `GET /v1/articles` -- list published articles.
#[utoipa::path(
    get,
    path = "/v1/articles",
    tag = "Articles",
    summary = "List published articles",
    description = "Returns published articles, newest first. Drafts are never \
                   included. No authentication required.",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Published articles", body = [BlogArticle]),
    )
)]
pub async fn list_published(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let articles = state
        .blog
        .list(ArticleFilter::PublishedOnly, query.limit)
        .await?;
    Ok((StatusCode::OK, Json(articles)))
}

/// `GET /v1/articles/{id}` -- fetch one published article.
#[utoipa::path(
    get,
    path = "/v1/articles/{id}",
    tag = "Articles",
    summary = "Get a published article",
    description = "Returns one published article by id. Drafts read as absent.",
    params(
        ("id" = String, Path, description = "Article ID"),
    ),
    responses(
        (status = 200, description = "The article", body = BlogArticle),
        (status = 404, description = "Not found or not published", body = ErrorResponse),
    )
)]
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let id = ArticleId::new(id);
    let article = state
        .blog
        .get_published(&id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("article not found: {id}")))?;
    Ok((StatusCode::OK, Json(article)))
}

/// `GET /v1/admin/articles` -- list every article, drafts included.
#[utoipa::path(
    get,
    path = "/v1/admin/articles",
    tag = "Articles",
    summary = "List all articles",
    description = "Returns every article, drafts included, newest first.",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "All articles", body = [BlogArticle]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
    )
)]
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let articles = state.blog.list(ArticleFilter::All, query.limit).await?;
    Ok((StatusCode::OK, Json(articles)))
}

/// `POST /v1/admin/articles` -- create a draft article.
#[utoipa::path(
    post,
    path = "/v1/admin/articles",
    tag = "Articles",
    summary = "Create an article",
    description = "Creates a new draft article. Content is sanitized before \
                   persistence; the article stays invisible to the public \
                   until published.",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "The created draft", body = BlogArticle),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(body): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let author = if user.email.is_empty() {
        user.id.to_string()
    } else {
        user.email.clone()
    };
    let article = state
        .blog
        .create(body.title, body.content, author, body.tags)
        .await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// `POST /v1/admin/articles/suggest` -- AI metadata for a draft.
#[utoipa::path(
    post,
    path = "/v1/admin/articles/suggest",
    tag = "Articles",
    summary = "Suggest article metadata",
    description = "Asks the generator for a title, summary, tags, and meta \
                   description for the given draft content. Nothing is stored; \
                   a reply that cannot be parsed is an error here, not a silent \
                   fallback.",
    request_body = SuggestRequest,
    responses(
        (status = 200, description = "Suggested metadata", body = ArticleSuggestion),
        (status = 400, description = "Draft content is empty", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 502, description = "Generator failed or replied unparseably", body = ErrorResponse),
    )
)]
pub async fn suggest(
    State(state): State<AppState>,
    Json(body): Json<SuggestRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let suggestion = state.suggestions.suggest_metadata(&body.content).await?;
    Ok((StatusCode::OK, Json(suggestion)))
}

/// `PUT /v1/admin/articles/{id}` -- update an article.
#[utoipa::path(
    put,
    path = "/v1/admin/articles/{id}",
    tag = "Articles",
    summary = "Update an article",
    description = "Applies a partial update. Omitted fields keep their current \
                   value; the published flag is not touched here.",
    params(
        ("id" = String, Path, description = "Article ID"),
    ),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "The updated article", body = BlogArticle),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateArticleRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let update = ArticleUpdate {
        title: body.title,
        content: body.content,
        summary: body.summary,
        tags: body.tags,
    };
    let article = state.blog.update(&ArticleId::new(id), update).await?;
    Ok((StatusCode::OK, Json(article)))
}

/// `POST /v1/admin/articles/{id}/publish` -- make an article public.
#[utoipa::path(
    post,
    path = "/v1/admin/articles/{id}/publish",
    tag = "Articles",
    summary = "Publish an article",
    description = "Marks the article published. Publishing an already published \
                   article only refreshes its update timestamp.",
    params(
        ("id" = String, Path, description = "Article ID"),
    ),
    responses(
        (status = 200, description = "The published article", body = BlogArticle),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let article = state.blog.set_published(&ArticleId::new(id), true).await?;
    Ok((StatusCode::OK, Json(article)))
}

/// `POST /v1/admin/articles/{id}/unpublish` -- return an article to draft.
#[utoipa::path(
    post,
    path = "/v1/admin/articles/{id}/unpublish",
    tag = "Articles",
    summary = "Unpublish an article",
    description = "Returns the article to draft. It disappears from the public \
                   listing and public by-id reads immediately.",
    params(
        ("id" = String, Path, description = "Article ID"),
    ),
    responses(
        (status = 200, description = "The unpublished article", body = BlogArticle),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let article = state.blog.set_published(&ArticleId::new(id), false).await?;
    Ok((StatusCode::OK, Json(article)))
}

/// `DELETE /v1/admin/articles/{id}` -- delete an article.
#[utoipa::path(
    delete,
    path = "/v1/admin/articles/{id}",
    tag = "Articles",
    summary = "Delete an article",
    description = "Deletes the article outright, published or not. It disappears \
                   from every listing and by-id read.",
    params(
        ("id" = String, Path, description = "Article ID"),
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.blog.delete(&ArticleId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
