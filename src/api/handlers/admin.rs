use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::{requests::{RejectAgentRequest, StatusQuery}, responses::ApiResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{inquiry::InquiryStatus, role::Role, tour::TourStatus, user::User};
use crate::domain::ports::{AgentReviewState, Scope};
use crate::domain::services::notifier::Notifier;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

fn parse_review_state(status: Option<&str>) -> Result<Option<AgentReviewState>, AppError> {
    match status {
        None | Some("") | Some("all") => Ok(None),
        Some("pending") => Ok(Some(AgentReviewState::Pending)),
        Some("verified") => Ok(Some(AgentReviewState::Verified)),
        Some("rejected") => Ok(Some(AgentReviewState::Rejected)),
        Some(other) => Err(AppError::Validation(format!("Unknown agent status: {}", other))),
    }
}

async fn find_agent(state: &AppState, id: &str) -> Result<User, AppError> {
    let user = state.user_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Agent not found".into()))?;
    if user.role() != Some(Role::Agent) {
        return Err(AppError::NotFound("Agent not found".into()));
    }
    Ok(user)
}

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let stats = json!({
        "total_properties": state.property_repo.count(None).await?,
        "total_agents": state.user_repo.count_by_role(Role::Agent.as_str()).await?,
        "pending_agents": state.user_repo.count_agents(AgentReviewState::Pending).await?,
        "verified_agents": state.user_repo.count_agents(AgentReviewState::Verified).await?,
        "total_clients": state.user_repo.count_by_role(Role::Client.as_str()).await?,
        "total_inquiries": state.inquiry_repo.count(Scope::All, None).await?,
        "pending_inquiries": state.inquiry_repo.count(Scope::All, Some(InquiryStatus::Pending.as_str())).await?,
        "total_tours": state.tour_repo.count(Scope::All, None).await?,
        "scheduled_tours": state.tour_repo.count(Scope::All, Some(TourStatus::Scheduled.as_str())).await?,
        "total_leads": state.lead_repo.count(None, None).await?,
        "new_leads": state.lead_repo.count(Some("new"), None).await?,
    });
    Ok(ApiResponse::stats(stats))
}

pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let review_state = parse_review_state(query.status.as_deref())?;
    Ok(ApiResponse::data(state.user_repo.list_agents(review_state).await?))
}

/// Verifies a pending agent. The profile change and the single approval
/// notification are committed together, so a failed write leaves the agent
/// pending and the approval can simply be retried.
pub async fn approve_agent(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut agent = find_agent(&state, &id).await?;
    if agent.is_verified_agent() && agent.is_active {
        return Err(AppError::Conflict("Agent is already verified".into()));
    }

    let now = Utc::now();
    let mut profile = agent.agent_profile.take().map(|p| p.0).unwrap_or_default();
    profile.is_verified = true;
    profile.verified_at = Some(now);
    agent.agent_profile = Some(sqlx::types::Json(profile));
    agent.is_active = true;
    agent.updated_at = now;

    let notification = Notifier::agent_approved(&agent);
    let updated = state.user_repo.update_with_notification(&agent, &notification).await.map_err(|e| {
        error!("Approval of agent {} failed: {:?}", agent.id, e);
        e
    })?;
    info!("Agent {} approved by admin {}", updated.id, admin.id);

    Ok(ApiResponse::data(updated).with_message("Agent approved"))
}

pub async fn reject_agent(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(id): Path<String>,
    payload: Option<Json<RejectAgentRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let reason = payload.and_then(|Json(p)| p.reason);
    let mut agent = find_agent(&state, &id).await?;

    let now = Utc::now();
    let mut profile = agent.agent_profile.take().map(|p| p.0).unwrap_or_default();
    profile.is_verified = false;
    profile.verified_at = None;
    agent.agent_profile = Some(sqlx::types::Json(profile));
    agent.is_active = false;
    agent.updated_at = now;

    let updated = state.user_repo.update(&agent).await?;
    state.auth_service.revoke_all(&updated.id).await?;
    info!("Agent {} rejected by admin {}", updated.id, admin.id);

    state.notifier.agent_rejected(&updated, reason.as_deref()).await;
    Ok(ApiResponse::data(updated).with_message("Agent rejected"))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.user_repo.list_by_role(Role::Client.as_str()).await?))
}

/// Removes one client account. Only rows the client solely owns go with it.
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Client not found".into()))?;
    if user.role() != Some(Role::Client) {
        return Err(AppError::NotFound("Client not found".into()));
    }

    state.user_repo.delete(&user.id).await?;
    info!("Client {} deleted by admin {}", user.id, admin.id);
    Ok(ApiResponse::message("Client deleted"))
}
