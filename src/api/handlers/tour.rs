use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{BookTourRequest, StatusQuery, UpdateTourStatusRequest},
    responses::ApiResponse,
};
use crate::api::extractors::auth::{ActiveUser, AuthUser};
use crate::domain::models::tour::{NewTourParams, Tour, TourStatus};
use crate::domain::ports::Scope;
use crate::error::AppError;
use crate::state::AppState;
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use tracing::info;

fn parse_status(status: Option<&str>) -> Result<Option<&str>, AppError> {
    match status {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse::<TourStatus>()
            .map(|_| Some(s))
            .map_err(AppError::Validation),
    }
}

/// Normalises "9:30" / "09:30" / "09:30:00" to "HH:MM".
fn normalize_time(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::Validation("scheduled_time must be HH:MM".into()))
}

pub async fn book_tour(
    State(state): State<Arc<AppState>>,
    ActiveUser(current): ActiveUser,
    JsonBody(payload): JsonBody<BookTourRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.scheduled_date < Utc::now().date_naive() {
        return Err(AppError::Validation("Tours cannot be booked in the past".into()));
    }
    let scheduled_time = normalize_time(&payload.scheduled_time)?;

    let property = state.property_repo.find_by_id(&payload.property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;
    state.user_repo.find_by_id(&property.agent_id).await?
        .ok_or(AppError::NotFound("The listing agent no longer exists".into()))?;

    if state.tour_repo.is_agent_booked(&property.agent_id, payload.scheduled_date, &scheduled_time).await? {
        return Err(AppError::Conflict("The agent already has a tour at that time".into()));
    }

    let tour = Tour::new(NewTourParams {
        property_id: property.id.clone(),
        client_id: current.id.clone(),
        agent_id: property.agent_id.clone(),
        scheduled_date: payload.scheduled_date,
        scheduled_time,
        notes: payload.notes,
    });
    let created = state.tour_repo.create(&tour).await?;
    info!("Tour {} booked by {} for property {}", created.id, current.id, property.id);

    state.notifier.tour_booked(&created, &property, &current.name).await;
    Ok((StatusCode::CREATED, ApiResponse::data(created).with_message("Tour booked")))
}

pub async fn list_client_tours(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    Ok(ApiResponse::data(state.tour_repo.list(Scope::Client(&current.id), status).await?))
}

pub async fn list_agent_tours(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    Ok(ApiResponse::data(state.tour_repo.list(Scope::Agent(&current.id), status).await?))
}

pub async fn list_all_tours(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;
    Ok(ApiResponse::data(state.tour_repo.list(Scope::All, status).await?))
}

pub async fn update_tour_status(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateTourStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let next: TourStatus = payload.status.parse().map_err(AppError::Validation)?;

    let mut tour = state.tour_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Tour not found".into()))?;
    if tour.agent_id != current.id {
        return Err(AppError::Forbidden("This tour belongs to another agent".into()));
    }

    tour.transition(next).map_err(AppError::Conflict)?;
    if payload.notes.is_some() {
        tour.notes = payload.notes;
    }
    let updated = state.tour_repo.update(&tour).await?;
    info!("Tour {} moved to {} by {}", updated.id, updated.status, current.id);

    state.notifier.tour_updated(&updated).await;
    Ok(ApiResponse::data(updated).with_message("Tour updated"))
}

/// Client-side cancellation. The row is kept with status `cancelled`.
pub async fn cancel_tour(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut tour = state.tour_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Tour not found".into()))?;
    if tour.client_id != current.id {
        return Err(AppError::Forbidden("This tour belongs to another client".into()));
    }

    tour.transition(TourStatus::Cancelled).map_err(AppError::Conflict)?;
    let updated = state.tour_repo.update(&tour).await?;
    info!("Tour {} cancelled by client {}", updated.id, current.id);

    state.notifier.tour_cancelled_by_client(&updated).await;
    Ok(ApiResponse::data(updated).with_message("Tour cancelled"))
}

pub async fn delete_tour(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.tour_repo.delete(&id).await?;
    info!("Tour {} deleted by admin", id);
    Ok(ApiResponse::message("Tour deleted"))
}
