use crate::domain::models::{
    auth::RefreshTokenRecord, category::Category, chat::ChatMessage,
    favorite::{Favorite, FavoriteWithProperty}, inquiry::{Inquiry, InquiryDetails}, lead::Lead,
    notification::Notification, property::{Property, PropertyFilter, PropertySort},
    saved_search::SavedSearch, settings::SiteSettings, testimonial::Testimonial,
    tour::{Tour, TourDetails}, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Whose records a listing or count covers.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    All,
    Agent(&'a str),
    Client(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentReviewState {
    Pending,
    Verified,
    Rejected,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    /// Saves the user and writes the notification atomically: both rows land or neither does.
    async fn update_with_notification(&self, user: &User, notification: &Notification) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list_agents(&self, state: Option<AgentReviewState>) -> Result<Vec<User>, AppError>;
    async fn list_by_role(&self, role: &str) -> Result<Vec<User>, AppError>;
    async fn count_by_role(&self, role: &str) -> Result<i64, AppError>;
    async fn count_agents(&self, state: AgentReviewState) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn store_session(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_session(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn revoke_session(&self, token_hash: &str) -> Result<(), AppError>;
    async fn revoke_family(&self, family_id: Uuid) -> Result<(), AppError>;
    /// Drops every refresh session of one user; returns how many went.
    async fn revoke_user_sessions(&self, user_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, property: &Property) -> Result<Property, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError>;
    async fn update(&self, property: &Property) -> Result<Property, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn search(&self, filter: &PropertyFilter, sort: PropertySort, limit: i64, offset: i64) -> Result<(Vec<Property>, i64), AppError>;
    async fn increment_views(&self, id: &str) -> Result<(), AppError>;
    async fn count(&self, agent_id: Option<&str>) -> Result<i64, AppError>;
    async fn total_views(&self, agent_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait InquiryRepository: Send + Sync {
    async fn create(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, AppError>;
    async fn update(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, scope: Scope<'_>, status: Option<&str>) -> Result<Vec<InquiryDetails>, AppError>;
    async fn count(&self, scope: Scope<'_>, status: Option<&str>) -> Result<i64, AppError>;
}

#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn create(&self, tour: &Tour) -> Result<Tour, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tour>, AppError>;
    async fn update(&self, tour: &Tour) -> Result<Tour, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, scope: Scope<'_>, status: Option<&str>) -> Result<Vec<TourDetails>, AppError>;
    async fn count(&self, scope: Scope<'_>, status: Option<&str>) -> Result<i64, AppError>;
    async fn is_agent_booked(&self, agent_id: &str, date: NaiveDate, time: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;
    async fn list_by_user(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, user_id: &str, id: &str) -> Result<Option<Notification>, AppError>;
    async fn mark_all_read(&self, user_id: &str) -> Result<u64, AppError>;
    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError>;
    async fn count_unread(&self, user_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn create(&self, favorite: &Favorite) -> Result<Favorite, AppError>;
    async fn delete(&self, user_id: &str, property_id: &str) -> Result<bool, AppError>;
    async fn list_with_properties(&self, user_id: &str) -> Result<Vec<FavoriteWithProperty>, AppError>;
    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait SavedSearchRepository: Send + Sync {
    async fn create(&self, search: &SavedSearch) -> Result<SavedSearch, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<SavedSearch>, AppError>;
    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError>;
    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, AppError>;
    async fn update(&self, lead: &Lead) -> Result<Lead, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, status: Option<&str>, agent_id: Option<&str>) -> Result<Vec<Lead>, AppError>;
    async fn count(&self, status: Option<&str>, agent_id: Option<&str>) -> Result<i64, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError>;
    async fn update(&self, category: &Category) -> Result<Category, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, active_only: bool) -> Result<Vec<Category>, AppError>;
}

#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    async fn create(&self, testimonial: &Testimonial) -> Result<Testimonial, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Testimonial>, AppError>;
    async fn update(&self, testimonial: &Testimonial) -> Result<Testimonial, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, approved_only: bool) -> Result<Vec<Testimonial>, AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<SiteSettings, AppError>;
    async fn save(&self, settings: &SiteSettings) -> Result<SiteSettings, AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        system_instruction: &str
    ) -> Result<String, AppError>;
}
