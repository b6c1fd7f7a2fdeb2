use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub content: String,
    pub rating: i32,
    pub avatar: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    pub fn new(name: String, title: Option<String>, content: String, rating: i32, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            title,
            content,
            rating,
            avatar,
            is_approved: false,
            created_at: Utc::now(),
        }
    }
}
