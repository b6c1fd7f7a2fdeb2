use crate::domain::models::{category::Category, role::Role, user::User};
use crate::domain::services::auth_service::hash_password;
use crate::error::AppError;
use crate::state::AppState;
use tracing::info;

const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("Residential", "Houses, apartments and condos for living"),
    ("Commercial", "Offices, retail and industrial spaces"),
    ("Luxury", "High-end villas and penthouses"),
    ("Land", "Plots and undeveloped land"),
    ("Vacation", "Holiday homes and short-term rentals"),
];

/// Creates the admin account if it does not exist yet. Returns true when a new account was created.
pub async fn ensure_admin(state: &AppState, email: &str, password: &str) -> Result<bool, AppError> {
    if state.user_repo.find_by_email(&email.trim().to_lowercase()).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(password)?;
    let admin = User::new("Administrator".to_string(), email.to_string(), password_hash, Role::Admin);
    state.user_repo.create(&admin).await?;
    info!("Bootstrap admin account created: {}", admin.email);
    Ok(true)
}

pub async fn seed_categories(state: &AppState) -> Result<(), AppError> {
    if !state.category_repo.list(false).await?.is_empty() {
        return Ok(());
    }

    for (name, description) in DEFAULT_CATEGORIES {
        let category = Category::new(name.to_string(), Some(description.to_string()));
        state.category_repo.create(&category).await?;
    }
    info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
    Ok(())
}

pub async fn run(state: &AppState) -> Result<(), AppError> {
    if let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) {
        ensure_admin(state, email, password).await?;
    }
    seed_categories(state).await
}
