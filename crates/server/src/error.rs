use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use glimpse_blog::BlogError;
use glimpse_render::RenderError;
use glimpse_state::StateError;

/// Errors that can occur when running the Glimpse server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication failed (missing or invalid credentials).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks permission for the requested operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is malformed or violates an input rule.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A dependency called on the caller's behalf failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Any other failure; details belong in the log, not the response.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({ "error": message });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StateError> for ServerError {
    fn from(err: StateError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<BlogError> for ServerError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound(id) => Self::NotFound(format!("article not found: {id}")),
            BlogError::EmptyDraft => Self::BadRequest("draft content is empty".to_owned()),
            BlogError::Suggestion(msg) => {
                Self::Upstream(format!("suggestion could not be parsed: {msg}"))
            }
            BlogError::Generator(e) => Self::Upstream(e.to_string()),
            BlogError::State(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<RenderError> for ServerError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnknownFormat(fmt) => {
                Self::BadRequest(format!("unknown export format: {fmt}"))
            }
            RenderError::Template(msg) => Self::Internal(format!("template error: {msg}")),
        }
    }
}
