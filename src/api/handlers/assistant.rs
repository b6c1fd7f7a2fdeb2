use axum::{extract::{Query, State}, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{AccessCheckQuery, ChatRequest, MortgageRequest},
    responses::{AccessCheckResponse, ApiResponse},
};
use crate::api::extractors::auth::MaybeAuthUser;
use crate::domain::models::chat::{ChatMessage, ChatRole};
use crate::domain::services::{
    access::is_path_allowed,
    chat_responder::{canned_reply, SYSTEM_INSTRUCTION},
    mortgage::{self, MortgageBreakdown, MortgageInsights},
};
use crate::error::AppError;
use crate::state::AppState;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Older turns are dropped before the history goes to the model.
const MAX_HISTORY: usize = 20;
const MAX_MESSAGE_CHARS: usize = 2000;

const INSIGHTS_INSTRUCTION: &str = "You are a friendly mortgage advisor for a real-estate marketplace. \
    Explain the numbers you are given in plain language and offer practical, non-binding tips. \
    Never promise approval or quote rates that were not provided.";

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub source: &'static str,
}

#[derive(Serialize)]
pub struct MortgageResult {
    #[serde(flatten)]
    pub breakdown: MortgageBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<MortgageInsights>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let last = payload.messages.last()
        .ok_or(AppError::Validation("At least one message is required".into()))?;
    if last.role != ChatRole::User || last.content.trim().is_empty() {
        return Err(AppError::Validation("The last message must be a non-empty user message".into()));
    }
    if payload.messages.iter().any(|m| m.content.chars().count() > MAX_MESSAGE_CHARS) {
        return Err(AppError::Validation(format!("Messages are limited to {} characters", MAX_MESSAGE_CHARS)));
    }
    let question = last.content.clone();

    if let Some(api_key) = &state.config.gemini_api_key {
        let start = payload.messages.len().saturating_sub(MAX_HISTORY);
        let history: &[ChatMessage] = &payload.messages[start..];
        match state.llm_service.generate(api_key, history, SYSTEM_INSTRUCTION).await {
            Ok(reply) => return Ok(ApiResponse::data(ChatReply { reply, source: "ai" })),
            Err(e) => warn!("Chat completion failed, using canned reply: {:?}", e),
        }
    }

    Ok(ApiResponse::data(ChatReply { reply: canned_reply(&question).to_string(), source: "canned" }))
}

pub async fn calculate_mortgage(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<MortgageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = payload.input;
    let breakdown = mortgage::calculate(&input)?;

    let insights = if payload.include_insights {
        let ai = match &state.config.gemini_api_key {
            Some(api_key) => {
                let prompt = vec![ChatMessage::user(mortgage::insights_prompt(&input, &breakdown))];
                match state.llm_service.generate(api_key, &prompt, INSIGHTS_INSTRUCTION).await {
                    Ok(raw) => {
                        let parsed = mortgage::parse_insights(&raw);
                        if parsed.is_none() {
                            warn!("Unparseable mortgage insights from AI, using fallback");
                        }
                        parsed
                    }
                    Err(e) => {
                        warn!("Mortgage insights request failed: {:?}", e);
                        None
                    }
                }
            }
            None => None,
        };
        Some(ai.unwrap_or_else(|| mortgage::fallback_insights(&input, &breakdown)))
    } else {
        None
    };

    info!("Mortgage calculated: loan {:.2}, monthly {:.2}", breakdown.loan_amount, breakdown.monthly_payment);
    Ok(ApiResponse::data(MortgageResult { breakdown, insights }))
}

/// Lets page guards ask whether the caller may open a path. Guests are never allowed.
pub async fn check_access(
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<AccessCheckQuery>,
) -> Result<impl IntoResponse, AppError> {
    let allowed = user.is_some_and(|u| is_path_allowed(&u.role, &query.path));
    Ok(ApiResponse::data(AccessCheckResponse { path: query.path, allowed }))
}
