use axum::{extract::State, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{requests::UpdateProfileRequest, responses::ApiResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{role::Role, user::AgentProfile};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use sqlx::types::Json as SqlJson;
use std::sync::Arc;
use tracing::info;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&current.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(ApiResponse::data(user))
}

/// Updates contact fields and the caller's own role profile. Verification
/// state is never writable here.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state.user_repo.find_by_id(&current.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }
        user.name = name;
    }
    if payload.phone.is_some() {
        user.phone = payload.phone;
    }
    if payload.avatar.is_some() {
        user.avatar = payload.avatar;
    }

    match user.role() {
        Some(Role::Agent) => {
            if let Some(input) = payload.agent_profile {
                let existing = user.agent_profile.take().map(|p| p.0).unwrap_or_default();
                user.agent_profile = Some(SqlJson(AgentProfile {
                    license_number: input.license_number.or(existing.license_number),
                    agency: input.agency.or(existing.agency),
                    experience_years: input.experience_years.or(existing.experience_years),
                    specialization: input.specialization.or(existing.specialization),
                    bio: input.bio.or(existing.bio),
                    is_verified: existing.is_verified,
                    verified_at: existing.verified_at,
                }));
            }
        }
        Some(Role::Client) => {
            if let Some(profile) = payload.client_profile {
                if let (Some(min), Some(max)) = (profile.budget_min, profile.budget_max)
                    && min > max {
                    return Err(AppError::Validation("budget_min cannot exceed budget_max".into()));
                }
                user.client_profile = Some(SqlJson(profile));
            }
        }
        _ => {}
    }

    user.updated_at = Utc::now();
    let updated = state.user_repo.update(&user).await?;
    info!("Profile updated for user {}", updated.id);
    Ok(ApiResponse::data(updated).with_message("Profile updated"))
}
