use axum::{extract::{Path, Query, State}, response::IntoResponse};
use crate::api::dtos::{requests::NotificationQuery, responses::ApiResponse};
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.notification_repo.list_by_user(&current.id, query.unread_only).await?;
    let unread = state.notification_repo.count_unread(&current.id).await?;

    let mut response = ApiResponse::data(items);
    response.stats = Some(json!({ "unread": unread }));
    Ok(response)
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let notification = state.notification_repo.mark_read(&current.id, &id).await?
        .ok_or(AppError::NotFound("Notification not found".into()))?;
    Ok(ApiResponse::data(notification))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.notification_repo.mark_all_read(&current.id).await?;
    Ok(ApiResponse::data(json!({ "updated": updated })).with_message("All notifications marked as read"))
}

pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.notification_repo.delete(&current.id, &id).await?;
    Ok(ApiResponse::message("Notification deleted"))
}
