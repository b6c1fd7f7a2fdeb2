use axum::{response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "status": "ok",
        "service": "metronest",
        "timestamp": chrono::Utc::now(),
    }))
}
