use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::provider::AuthenticatedUser;
use crate::api::AppState;
use crate::error::ServerError;

/// Extract the raw bearer token from the `Authorization` header.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Require a valid bearer token and attach the resolved principal to the
/// request extensions for handlers downstream.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(token) = bearer_token(&request) else {
        return Err(ServerError::Unauthorized("missing bearer token".to_owned()));
    };

    let user = state
        .identity
        .authenticate(token)
        .await
        .ok_or_else(|| ServerError::Unauthorized("invalid bearer token".to_owned()))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Require that the already-authenticated principal holds the admin role.
///
/// Must sit inside [`require_user`], which inserts the extension.
pub async fn require_admin(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if !user.role.is_admin() {
        return Err(ServerError::Forbidden(format!(
            "role '{}' may not manage articles",
            user.role
        )));
    }
    Ok(next.run(request).await)
}
