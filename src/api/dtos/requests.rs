use crate::domain::models::{
    chat::ChatMessage,
    property::{PropertyFilter, PropertySort},
    user::ClientProfile,
};
use crate::domain::services::mortgage::MortgageInput;
use chrono::NaiveDate;
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 50;
/// Keeps `(page - 1) * limit` inside `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Deserialize, Default)]
pub struct AgentProfileInput {
    pub license_number: Option<String>,
    pub agency: Option<String>,
    pub experience_years: Option<i32>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub agent_profile: Option<AgentProfileInput>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub agent_profile: Option<AgentProfileInput>,
    pub client_profile: Option<ClientProfile>,
}

/// Query string for property listings. Kept flat because urlencoded
/// numbers do not survive `#[serde(flatten)]`.
#[derive(Deserialize, Default)]
pub struct PropertyQuery {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<i32>,
    pub featured: Option<bool>,
    pub sort: Option<PropertySort>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PropertyQuery {
    pub fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            keyword: self.keyword.clone(),
            city: self.city.clone(),
            property_type: self.property_type.clone(),
            status: self.status.clone(),
            category_id: self.category_id.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            featured: self.featured,
            agent_id: None,
        }
    }

    /// (page, limit) with 1 <= page <= MAX_PAGE and 1 <= limit <= MAX_PAGE_SIZE.
    pub fn paging(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }
}

#[derive(Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub property_type: String,
    pub status: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<f64>,
    pub category_id: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<f64>,
    pub category_id: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    /// Honoured for admins only.
    pub is_featured: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateInquiryRequest {
    pub property_id: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ReplyInquiryRequest {
    pub response: String,
}

#[derive(Deserialize)]
pub struct BookTourRequest {
    pub property_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTourStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ToggleFavoriteRequest {
    pub property_id: String,
}

#[derive(Deserialize)]
pub struct CreateSavedSearchRequest {
    pub name: String,
    #[serde(default)]
    pub criteria: PropertyFilter,
    pub alerts_enabled: Option<bool>,
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub property_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateLeadRequest {
    pub status: Option<String>,
    pub agent_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateTestimonialRequest {
    pub name: String,
    pub title: Option<String>,
    pub content: String,
    pub rating: i32,
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub site_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub currency: Option<String>,
    pub maintenance_mode: Option<bool>,
}

#[derive(Deserialize, Default)]
pub struct RejectAgentRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Deserialize)]
pub struct AccessCheckQuery {
    pub path: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct MortgageRequest {
    #[serde(flatten)]
    pub input: MortgageInput,
    #[serde(default)]
    pub include_insights: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_is_clamped() {
        let q = PropertyQuery { page: Some(0), limit: Some(500), ..Default::default() };
        assert_eq!(q.paging(), (1, MAX_PAGE_SIZE));

        let q = PropertyQuery::default();
        assert_eq!(q.paging(), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let q = PropertyQuery { page: Some(i64::MAX), limit: Some(MAX_PAGE_SIZE), ..Default::default() };
        let (page, limit) = q.paging();
        assert_eq!(page, MAX_PAGE);
        assert!((page - 1).checked_mul(limit).is_some());
    }

    #[test]
    fn test_filter_never_carries_agent() {
        let q = PropertyQuery { city: Some("Austin".into()), min_bedrooms: Some(2), ..Default::default() };
        let f = q.filter();
        assert_eq!(f.city.as_deref(), Some("Austin"));
        assert_eq!(f.min_bedrooms, Some(2));
        assert!(f.agent_id.is_none());
    }
}
