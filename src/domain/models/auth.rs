use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const TOKEN_AUDIENCE: &str = "metronest-web";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://metronest.app/claims/role")]
    pub role: String,

    #[serde(rename = "https://metronest.app/claims/email")]
    pub email: String,

    #[serde(rename = "https://metronest.app/claims/name")]
    pub name: String,

    #[serde(rename = "https://metronest.app/claims/csrf")]
    pub csrf_token: String,
}

#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: String,
    pub family_id: Uuid,
    pub generation_id: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// The actor behind a request, as carried by the access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: String,
    pub email: String,
    pub name: String,
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub csrf_token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}
