use std::sync::Arc;
use crate::domain::ports::{
    UserRepository, AuthRepository, PropertyRepository, InquiryRepository, TourRepository,
    NotificationRepository, FavoriteRepository, SavedSearchRepository, LeadRepository,
    CategoryRepository, TestimonialRepository, SettingsRepository, LlmService
};
use crate::domain::services::{auth_service::AuthService, notifier::Notifier};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub property_repo: Arc<dyn PropertyRepository>,
    pub inquiry_repo: Arc<dyn InquiryRepository>,
    pub tour_repo: Arc<dyn TourRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub favorite_repo: Arc<dyn FavoriteRepository>,
    pub saved_search_repo: Arc<dyn SavedSearchRepository>,
    pub lead_repo: Arc<dyn LeadRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub testimonial_repo: Arc<dyn TestimonialRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub auth_service: Arc<AuthService>,
    pub notifier: Arc<Notifier>,
    pub llm_service: Arc<dyn LlmService>,
}
