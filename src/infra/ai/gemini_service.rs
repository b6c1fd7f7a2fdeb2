use crate::domain::models::chat::{ChatMessage, ChatRole};
use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info, warn, instrument};
use std::time::Duration;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiService {
    client: Client,
    model: String,
}

impl GeminiService {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }

    async fn send_request_with_retry(&self, url: &str, api_key: &str, payload: &Value) -> Result<String, AppError> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(url)
                .header("x-goog-api-key", api_key)
                .header("Content-Type", "application/json")
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            error!("Failed to parse Gemini response JSON: {:?}", e);
                            AppError::Internal
                        })?;
                        return extract_content(body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Gemini API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::InternalWithMsg(format!("AI Provider Error: {} - {}", status, text)));
                        }
                        warn!("Gemini API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Gemini API terminal error {}: {}", status, text);
                        return Err(AppError::InternalWithMsg(format!("AI Request Rejected: {}", status)));
                    }
                },
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Gemini network error after {} retries: {:?}", retries, e);
                        return Err(AppError::InternalWithMsg(format!("AI Network Error: {}", e)));
                    }
                    warn!("Gemini network error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

/// Gemini names the assistant side of a conversation "model".
fn to_contents(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect()
}

fn extract_content(body: Value) -> Result<String, AppError> {
    if let Some(candidates) = body.get("candidates").and_then(|c| c.as_array())
        && let Some(first) = candidates.first() {

        if let Some(finish_reason) = first.get("finishReason").and_then(|s| s.as_str())
            && finish_reason != "STOP" {
                warn!("AI generation stopped abnormally. Reason: {}", finish_reason);
                if finish_reason == "SAFETY" {
                    return Err(AppError::InternalWithMsg("AI content generation blocked by safety filters".to_string()));
                }
            }

        if let Some(content) = first.get("content")
            && let Some(parts) = content.get("parts").and_then(|p| p.as_array())
            && let Some(text_part) = parts.first()
            && let Some(text) = text_part.get("text").and_then(|t| t.as_str())
            && !text.trim().is_empty() {
            return Ok(text.trim().to_string());
        }
    }

    error!("Invalid or unexpected response structure from Gemini: {:?}", body);
    Err(AppError::InternalWithMsg("AI response missing content".to_string()))
}

#[async_trait]
impl LlmService for GeminiService {
    #[instrument(skip(self, api_key, messages, system_instruction), fields(model = %self.model, turns = messages.len()))]
    async fn generate(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        system_instruction: &str
    ) -> Result<String, AppError> {
        let payload = json!({
            "contents": to_contents(messages),
            "systemInstruction": {
                "parts": [{"text": system_instruction}]
            },
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 1024,
                "topP": 0.8,
                "topK": 40
            },
            "safetySettings": [
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" }
            ]
        });

        info!("Sending generation request to Gemini...");
        let result = self.send_request_with_retry(&self.endpoint(), api_key, &payload).await?;
        info!("Generated {} chars from AI.", result.len());
        Ok(result)
    }
}
