use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{CreateInquiryRequest, ReplyInquiryRequest, StatusQuery},
    responses::ApiResponse,
};
use crate::api::extractors::auth::{ActiveUser, AuthUser};
use crate::domain::models::{auth::CurrentUser, inquiry::{Inquiry, InquiryStatus}};
use crate::domain::ports::Scope;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

fn parse_status(status: Option<&str>) -> Result<Option<&str>, AppError> {
    match status {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse::<InquiryStatus>()
            .map(|_| Some(s))
            .map_err(AppError::Validation),
    }
}

async fn find_owned(state: &AppState, current: &CurrentUser, id: &str) -> Result<Inquiry, AppError> {
    let inquiry = state.inquiry_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Inquiry not found".into()))?;
    if inquiry.agent_id != current.id {
        return Err(AppError::Forbidden("This inquiry belongs to another agent".into()));
    }
    Ok(inquiry)
}

pub async fn create_inquiry(
    State(state): State<Arc<AppState>>,
    ActiveUser(current): ActiveUser,
    JsonBody(payload): JsonBody<CreateInquiryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::Validation("Message is required".into()));
    }

    let property = state.property_repo.find_by_id(&payload.property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;
    state.user_repo.find_by_id(&property.agent_id).await?
        .ok_or(AppError::NotFound("The listing agent no longer exists".into()))?;

    let inquiry = Inquiry::new(property.id.clone(), current.id.clone(), property.agent_id.clone(), message);
    let created = state.inquiry_repo.create(&inquiry).await?;
    info!("Inquiry {} created by {} for property {}", created.id, current.id, property.id);

    state.notifier.inquiry_received(&created, &property, &current.name).await;
    Ok((StatusCode::CREATED, ApiResponse::data(created).with_message("Inquiry sent")))
}

pub async fn list_client_inquiries(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    let items = state.inquiry_repo.list(Scope::Client(&current.id), status).await?;
    Ok(ApiResponse::data(items))
}

pub async fn list_agent_inquiries(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    let items = state.inquiry_repo.list(Scope::Agent(&current.id), status).await?;
    Ok(ApiResponse::data(items))
}

pub async fn list_all_inquiries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    let items = state.inquiry_repo.list(Scope::All, status).await?;
    Ok(ApiResponse::data(items))
}

pub async fn reply_inquiry(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ReplyInquiryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = payload.response.trim().to_string();
    if response.is_empty() {
        return Err(AppError::Validation("Response is required".into()));
    }

    let mut inquiry = find_owned(&state, &current, &id).await?;
    inquiry.reply(response).map_err(AppError::Conflict)?;
    let updated = state.inquiry_repo.update(&inquiry).await?;
    info!("Agent {} replied to inquiry {}", current.id, updated.id);

    let property_title = state.property_repo.find_by_id(&updated.property_id).await?
        .map(|p| p.title)
        .unwrap_or_else(|| "a property".to_string());
    state.notifier.inquiry_replied(&updated, &property_title).await;

    Ok(ApiResponse::data(updated).with_message("Reply sent"))
}

pub async fn close_inquiry(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut inquiry = find_owned(&state, &current, &id).await?;
    inquiry.close().map_err(AppError::Conflict)?;
    let updated = state.inquiry_repo.update(&inquiry).await?;
    info!("Inquiry {} closed by {}", updated.id, current.id);
    Ok(ApiResponse::data(updated).with_message("Inquiry closed"))
}

pub async fn delete_agent_inquiry(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let inquiry = find_owned(&state, &current, &id).await?;
    state.inquiry_repo.delete(&inquiry.id).await?;
    info!("Inquiry {} deleted by agent {}", id, current.id);
    Ok(ApiResponse::message("Inquiry deleted"))
}

pub async fn delete_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.inquiry_repo.delete(&id).await?;
    info!("Inquiry {} deleted by admin", id);
    Ok(ApiResponse::message("Inquiry deleted"))
}
