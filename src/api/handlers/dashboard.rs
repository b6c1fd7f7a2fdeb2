use axum::{extract::State, response::IntoResponse};
use crate::api::dtos::responses::ApiResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{inquiry::InquiryStatus, tour::TourStatus};
use crate::domain::ports::Scope;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;

pub async fn agent_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let scope = Scope::Agent(&current.id);
    let stats = json!({
        "total_properties": state.property_repo.count(Some(&current.id)).await?,
        "total_views": state.property_repo.total_views(&current.id).await?,
        "total_inquiries": state.inquiry_repo.count(scope, None).await?,
        "pending_inquiries": state.inquiry_repo.count(scope, Some(InquiryStatus::Pending.as_str())).await?,
        "total_tours": state.tour_repo.count(scope, None).await?,
        "scheduled_tours": state.tour_repo.count(scope, Some(TourStatus::Scheduled.as_str())).await?,
        "assigned_leads": state.lead_repo.count(None, Some(&current.id)).await?,
        "unread_notifications": state.notification_repo.count_unread(&current.id).await?,
    });
    Ok(ApiResponse::stats(stats))
}

pub async fn client_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let scope = Scope::Client(&current.id);
    let stats = json!({
        "favorites": state.favorite_repo.count_by_user(&current.id).await?,
        "saved_searches": state.saved_search_repo.count_by_user(&current.id).await?,
        "total_inquiries": state.inquiry_repo.count(scope, None).await?,
        "replied_inquiries": state.inquiry_repo.count(scope, Some(InquiryStatus::Replied.as_str())).await?,
        "total_tours": state.tour_repo.count(scope, None).await?,
        "upcoming_tours": state.tour_repo.count(scope, Some(TourStatus::Scheduled.as_str())).await?,
        "unread_notifications": state.notification_repo.count_unread(&current.id).await?,
    });
    Ok(ApiResponse::stats(stats))
}
