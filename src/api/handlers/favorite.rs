use axum::{extract::{Path, State}, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{requests::ToggleFavoriteRequest, responses::ApiResponse};
use crate::api::extractors::auth::{ActiveUser, AuthUser};
use crate::domain::models::favorite::Favorite;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.favorite_repo.list_with_properties(&current.id).await?))
}

/// Flips membership of (caller, property) in the favorites set.
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    ActiveUser(current): ActiveUser,
    JsonBody(payload): JsonBody<ToggleFavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.property_repo.find_by_id(&payload.property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    let favorited = if state.favorite_repo.delete(&current.id, &payload.property_id).await? {
        false
    } else {
        let favorite = Favorite::new(current.id.clone(), payload.property_id.clone());
        match state.favorite_repo.create(&favorite).await {
            Ok(_) => true,
            // A concurrent toggle already inserted the pair.
            Err(e) if e.status() == axum::http::StatusCode::CONFLICT => true,
            Err(e) => return Err(e),
        }
    };

    info!("User {} favorite {} -> {}", current.id, payload.property_id, favorited);
    let message = if favorited { "Added to favorites" } else { "Removed from favorites" };
    Ok(ApiResponse::data(json!({ "property_id": payload.property_id, "favorited": favorited }))
        .with_message(message))
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.favorite_repo.delete(&current.id, &property_id).await? {
        return Err(AppError::NotFound("Favorite not found".into()));
    }
    info!("User {} removed favorite {}", current.id, property_id);
    Ok(ApiResponse::message("Removed from favorites"))
}
