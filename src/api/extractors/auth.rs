use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::{auth::CurrentUser, user::User};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{warn, Span};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// The authenticated caller. Accepts the access token from the cookie or an
/// `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

enum TokenSource {
    Cookie,
    Bearer,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts.headers.get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn find_token(parts: &Parts) -> Option<(String, TokenSource)> {
    if let Some(token) = bearer_token(parts) {
        return Some((token, TokenSource::Bearer));
    }
    parts.extensions.get::<Cookies>()
        .and_then(|cookies| cookies.get(ACCESS_COOKIE))
        .map(|c| (c.value().to_string(), TokenSource::Cookie))
}

fn is_safe_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
}

pub(crate) fn authenticate(parts: &Parts, state: &AppState) -> Result<CurrentUser, AppError> {
    let (token, source) = find_token(parts).ok_or(AppError::Unauthorized)?;
    let claims = state.auth_service.verify_access_token(&token)?;

    // Browsers attach cookies on their own, so cookie-borne tokens must echo the CSRF secret.
    if matches!(source, TokenSource::Cookie) && !is_safe_method(&parts.method) {
        let header_val = parts.headers.get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Forbidden("Missing CSRF token".into()))?;

        if header_val != claims.csrf_token {
            return Err(AppError::Forbidden("Invalid CSRF token".into()));
        }
    }

    let user = CurrentUser::from(claims);
    Span::current().record("user_id", &user.id);
    Ok(user)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(AuthUser(user.clone()));
        }

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = authenticate(parts, &app_state)?;
        parts.extensions.insert(user.clone());
        Ok(AuthUser(user))
    }
}

/// [`AuthUser`] backed by a fresh read of the account row. Used by handlers
/// that create records pointing at the caller: a deleted account is rejected
/// with 401 and a deactivated one with 403 even while its token is unexpired.
pub struct ActiveUser(pub User);

impl<S> FromRequestParts<S> for ActiveUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(current) = AuthUser::from_request_parts(parts, state).await?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let user = app_state.user_repo.find_by_id(&current.id).await?
            .ok_or_else(|| {
                warn!("Token for deleted user {} rejected", current.id);
                AppError::Unauthorized
            })?;
        if !user.is_active {
            return Err(AppError::Forbidden("This account has been deactivated".into()));
        }
        Ok(ActiveUser(user))
    }
}

/// Like [`AuthUser`] but treats a missing or invalid token as a guest.
pub struct MaybeAuthUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(MaybeAuthUser(Some(user.clone())));
        }

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = find_token(parts)
            .and_then(|(token, _)| app_state.auth_service.verify_access_token(&token).ok())
            .map(CurrentUser::from);
        Ok(MaybeAuthUser(user))
    }
}
