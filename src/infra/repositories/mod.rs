pub mod sqlite_auth_repo;
pub mod sqlite_user_repo;
pub mod sqlite_property_repo;
pub mod sqlite_inquiry_repo;
pub mod sqlite_tour_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_favorite_repo;
pub mod sqlite_saved_search_repo;
pub mod sqlite_lead_repo;
pub mod sqlite_category_repo;
pub mod sqlite_testimonial_repo;
pub mod sqlite_settings_repo;
