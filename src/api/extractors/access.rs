use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use crate::api::extractors::auth::authenticate;
use crate::domain::services::access::is_path_allowed;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::warn;

/// Route guard for the role-scoped API groups: 401 without a valid token,
/// 403 when the caller's role may not visit the path.
pub async fn require_access(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let user = authenticate(&parts, &state)?;

    let path = parts.uri.path().to_string();
    if !is_path_allowed(&user.role, &path) {
        warn!("Access denied: {} ({}) -> {}", user.id, user.role, path);
        return Err(AppError::Forbidden("You do not have access to this resource".into()));
    }

    parts.extensions.insert(user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
