use axum::{extract::State, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{requests::{LoginRequest, RegisterRequest}, responses::ApiResponse};
use crate::api::extractors::auth::{AuthUser, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::domain::models::{
    auth::{AuthResponse, TokenPair, UserProfile},
    role::Role,
    user::{AgentProfile, User},
};
use crate::domain::services::auth_service::{hash_password, verify_password, ACCESS_TOKEN_MINUTES, REFRESH_TOKEN_DAYS};
use crate::error::AppError;
use crate::state::AppState;
use sqlx::types::Json as SqlJson;
use std::sync::Arc;
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{info, warn};

pub const MIN_PASSWORD_LEN: usize = 8;

pub async fn register(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = match payload.role.as_deref().unwrap_or("client").parse::<Role>() {
        Ok(Role::Admin) | Err(_) => return Err(AppError::Validation("Role must be client or agent".into())),
        Ok(role) => role,
    };

    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("Name and a valid email are required".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_LEN)));
    }
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("An account with this email already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let mut user = User::new(name, email, password_hash, role);
    user.phone = payload.phone;
    if role == Role::Agent {
        let input = payload.agent_profile.unwrap_or_default();
        user.agent_profile = Some(SqlJson(AgentProfile {
            license_number: input.license_number,
            agency: input.agency,
            experience_years: input.experience_years,
            specialization: input.specialization,
            bio: input.bio,
            is_verified: false,
            verified_at: None,
        }));
    }

    let created = state.user_repo.create(&user).await?;
    info!("Registered {} account {}", created.role, created.id);

    if role == Role::Agent {
        return Ok((
            StatusCode::CREATED,
            ApiResponse::data(created)
                .with_message("Registration received. Your agent account is awaiting admin approval."),
        ).into_response());
    }

    let tokens = state.auth_service.login(&created).await?;
    set_cookies(&cookies, &tokens);
    Ok((StatusCode::CREATED, ApiResponse::data(auth_response(tokens, &created))).into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email.trim().to_lowercase()).await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!("Failed login attempt for user {}", user.id);
        return Err(AppError::Unauthorized);
    }
    if !user.is_active {
        return Err(AppError::Forbidden("This account has been deactivated".into()));
    }
    if user.role() == Some(Role::Agent) && !user.is_verified_agent() {
        return Err(AppError::Forbidden("Your agent account is awaiting admin approval".into()));
    }

    let tokens = state.auth_service.login(&user).await?;
    set_cookies(&cookies, &tokens);

    info!("User logged in: {}", user.id);
    Ok(ApiResponse::data(auth_response(tokens, &user)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get(REFRESH_COOKIE).ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value().to_string();

    let token_hash = state.auth_service.hash_token(&raw_token);
    let record = state.auth_repo.find_session(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    if !user.is_active {
        state.auth_service.logout(&raw_token).await?;
        return Err(AppError::Forbidden("This account has been deactivated".into()));
    }

    let tokens = state.auth_service.refresh(&raw_token, &user).await?;
    set_cookies(&cookies, &tokens);

    info!("Token refreshed for user: {}", user.id);
    Ok(ApiResponse::data(auth_response(tokens, &user)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get(REFRESH_COOKIE)
        && let Err(e) = state.auth_service.logout(cookie.value()).await {
        warn!("Failed to revoke refresh token family: {:?}", e);
    }

    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());
    cookies.remove(Cookie::build((REFRESH_COOKIE, "")).path("/").into());

    info!("User logged out");
    Ok(ApiResponse::message("Logged out"))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&current.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(ApiResponse::data(user))
}

fn auth_response(tokens: TokenPair, user: &User) -> AuthResponse {
    AuthResponse {
        access_token: tokens.access_token,
        csrf_token: tokens.csrf_token,
        user: UserProfile {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        },
    }
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair) {
    let mut access_c = Cookie::new(ACCESS_COOKIE, tokens.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(ACCESS_TOKEN_MINUTES));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_COOKIE, tokens.refresh_token.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(REFRESH_TOKEN_DAYS));
    cookies.add(refresh_c);
}
