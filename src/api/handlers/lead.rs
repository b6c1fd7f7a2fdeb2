use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{ContactRequest, CreateLeadRequest, StatusQuery, UpdateLeadRequest},
    responses::ApiResponse,
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{
    lead::{Lead, NewLeadParams, LEAD_SOURCES, LEAD_STATUSES},
    role::Role,
};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

fn validate_contact(name: &str, email: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    Ok(())
}

fn parse_lead_status(status: Option<&str>) -> Result<Option<&str>, AppError> {
    match status {
        None | Some("") | Some("all") => Ok(None),
        Some(s) if LEAD_STATUSES.contains(&s) => Ok(Some(s)),
        Some(s) => Err(AppError::Validation(format!("Unknown lead status: {}", s))),
    }
}

/// Public contact form; stored as a lead with source `contact`.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_contact(&payload.name, &payload.email)?;
    if payload.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".into()));
    }

    let message = match payload.subject.as_deref().map(str::trim) {
        Some(subject) if !subject.is_empty() => format!("[{}] {}", subject, payload.message.trim()),
        _ => payload.message.trim().to_string(),
    };

    let lead = Lead::new(NewLeadParams {
        name: payload.name.trim().to_string(),
        email: payload.email,
        phone: payload.phone,
        message: Some(message),
        source: "contact".to_string(),
        property_id: None,
        agent_id: None,
    });
    let created = state.lead_repo.create(&lead).await?;
    info!("Contact message stored as lead {}", created.id);
    Ok((StatusCode::CREATED, ApiResponse::message("Thanks for reaching out! We will get back to you shortly.")))
}

/// Public lead capture. A property lead is routed to the listing's agent.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateLeadRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_contact(&payload.name, &payload.email)?;

    let source = payload.source.unwrap_or_else(|| {
        if payload.property_id.is_some() { "property" } else { "other" }.to_string()
    });
    if !LEAD_SOURCES.contains(&source.as_str()) {
        return Err(AppError::Validation(format!("Unknown lead source: {}", source)));
    }

    let agent_id = match &payload.property_id {
        Some(property_id) => {
            let property = state.property_repo.find_by_id(property_id).await?
                .ok_or(AppError::NotFound("Property not found".into()))?;
            Some(property.agent_id)
        }
        None => None,
    };

    let lead = Lead::new(NewLeadParams {
        name: payload.name.trim().to_string(),
        email: payload.email,
        phone: payload.phone,
        message: payload.message,
        source,
        property_id: payload.property_id,
        agent_id: agent_id.clone(),
    });
    let created = state.lead_repo.create(&lead).await?;
    info!("Lead {} captured from {}", created.id, created.source);

    if let Some(agent_id) = agent_id {
        state.notifier.lead_assigned(&created, &agent_id).await;
    }
    Ok((StatusCode::CREATED, ApiResponse::data(created).with_message("Thanks! An agent will contact you soon.")))
}

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_lead_status(query.status.as_deref())?;
    Ok(ApiResponse::data(state.lead_repo.list(status, None).await?))
}

pub async fn list_agent_leads(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_lead_status(query.status.as_deref())?;
    Ok(ApiResponse::data(state.lead_repo.list(status, Some(&current.id)).await?))
}

/// Admin triage: status changes and (re)assignment to an agent.
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateLeadRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut lead = state.lead_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Lead not found".into()))?;

    if let Some(status) = payload.status {
        if !LEAD_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Validation(format!("Unknown lead status: {}", status)));
        }
        lead.status = status;
    }

    let mut newly_assigned = None;
    if let Some(agent_id) = payload.agent_id.filter(|a| !a.trim().is_empty()) {
        let agent = state.user_repo.find_by_id(&agent_id).await?
            .ok_or(AppError::NotFound("Agent not found".into()))?;
        if agent.role() != Some(Role::Agent) {
            return Err(AppError::Validation("Leads can only be assigned to agents".into()));
        }
        if lead.agent_id.as_deref() != Some(agent.id.as_str()) {
            newly_assigned = Some(agent.id.clone());
        }
        lead.agent_id = Some(agent.id);
    }

    lead.updated_at = Utc::now();
    let updated = state.lead_repo.update(&lead).await?;
    info!("Lead {} updated (status {})", updated.id, updated.status);

    if let Some(agent_id) = newly_assigned {
        state.notifier.lead_assigned(&updated, &agent_id).await;
    }
    Ok(ApiResponse::data(updated).with_message("Lead updated"))
}

pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.lead_repo.delete(&id).await?;
    info!("Lead {} deleted", id);
    Ok(ApiResponse::message("Lead deleted"))
}
