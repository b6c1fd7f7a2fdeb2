use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{requests::CreateSavedSearchRequest, responses::ApiResponse};
use crate::api::extractors::auth::{ActiveUser, AuthUser};
use crate::domain::models::saved_search::SavedSearch;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_saved_searches(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.saved_search_repo.list_by_user(&current.id).await?))
}

pub async fn create_saved_search(
    State(state): State<Arc<AppState>>,
    ActiveUser(current): ActiveUser,
    JsonBody(payload): JsonBody<CreateSavedSearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if let (Some(min), Some(max)) = (payload.criteria.min_price, payload.criteria.max_price)
        && min > max {
        return Err(AppError::Validation("min_price cannot exceed max_price".into()));
    }

    let search = SavedSearch::new(current.id.clone(), name, payload.criteria, payload.alerts_enabled.unwrap_or(true));
    let created = state.saved_search_repo.create(&search).await?;
    info!("User {} saved search {}", current.id, created.id);
    Ok((StatusCode::CREATED, ApiResponse::data(created).with_message("Search saved")))
}

pub async fn delete_saved_search(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.saved_search_repo.delete(&current.id, &id).await?;
    info!("User {} deleted saved search {}", current.id, id);
    Ok(ApiResponse::message("Saved search deleted"))
}
