use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub mod kind {
    pub const AGENT_APPROVED: &str = "agent_approved";
    pub const AGENT_REJECTED: &str = "agent_rejected";
    pub const INQUIRY_RECEIVED: &str = "inquiry_received";
    pub const INQUIRY_REPLIED: &str = "inquiry_replied";
    pub const TOUR_BOOKED: &str = "tour_booked";
    pub const TOUR_UPDATED: &str = "tour_updated";
    pub const TOUR_CANCELLED: &str = "tour_cancelled";
    pub const LEAD_ASSIGNED: &str = "lead_assigned";
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: &str, kind: &str, title: impl Into<String>, message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: kind.to_string(),
            title: title.into(),
            message: message.into(),
            is_read: false,
            link,
            created_at: Utc::now(),
        }
    }
}
