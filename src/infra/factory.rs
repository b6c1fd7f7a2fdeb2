use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions};
use sqlx::{SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::ai::gemini_service::GeminiService;
use crate::domain::services::{auth_service::AuthService, notifier::Notifier};
use crate::infra::repositories::{
    sqlite_auth_repo::SqliteAuthRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_property_repo::SqlitePropertyRepo, sqlite_inquiry_repo::SqliteInquiryRepo,
    sqlite_tour_repo::SqliteTourRepo, sqlite_notification_repo::SqliteNotificationRepo,
    sqlite_favorite_repo::SqliteFavoriteRepo, sqlite_saved_search_repo::SqliteSavedSearchRepo,
    sqlite_lead_repo::SqliteLeadRepo, sqlite_category_repo::SqliteCategoryRepo,
    sqlite_testimonial_repo::SqliteTestimonialRepo, sqlite_settings_repo::SqliteSettingsRepo,
};

pub async fn connect_pool(database_url: &str) -> SqlitePool {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;
    pool
}

/// Wires every port to its SQLite adapter on a shared pool.
pub fn state_from_pool(pool: SqlitePool, config: &Config) -> AppState {
    let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
    let notification_repo = Arc::new(SqliteNotificationRepo::new(pool.clone()));
    let notifier = Arc::new(Notifier::new(notification_repo.clone()));

    AppState {
        config: config.clone(),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        auth_repo,
        property_repo: Arc::new(SqlitePropertyRepo::new(pool.clone())),
        inquiry_repo: Arc::new(SqliteInquiryRepo::new(pool.clone())),
        tour_repo: Arc::new(SqliteTourRepo::new(pool.clone())),
        notification_repo,
        favorite_repo: Arc::new(SqliteFavoriteRepo::new(pool.clone())),
        saved_search_repo: Arc::new(SqliteSavedSearchRepo::new(pool.clone())),
        lead_repo: Arc::new(SqliteLeadRepo::new(pool.clone())),
        category_repo: Arc::new(SqliteCategoryRepo::new(pool.clone())),
        testimonial_repo: Arc::new(SqliteTestimonialRepo::new(pool.clone())),
        settings_repo: Arc::new(SqliteSettingsRepo::new(pool)),
        auth_service,
        notifier,
        llm_service: Arc::new(GeminiService::new(config.gemini_model.clone())),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let pool = connect_pool(&config.database_url).await;
    state_from_pool(pool, config)
}

pub async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
