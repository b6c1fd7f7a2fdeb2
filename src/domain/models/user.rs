use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use super::role::Role;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AgentProfile {
    pub license_number: Option<String>,
    pub agency: Option<String>,
    pub experience_years: Option<i32>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClientProfile {
    pub preferred_locations: Vec<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub preferred_property_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub agent_profile: Option<Json<AgentProfile>>,
    pub client_profile: Option<Json<ClientProfile>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        let (agent_profile, client_profile) = match role {
            Role::Agent => (Some(Json(AgentProfile::default())), None),
            Role::Client => (None, Some(Json(ClientProfile::default()))),
            Role::Admin => (None, None),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.trim().to_lowercase(),
            password_hash,
            role: role.to_string(),
            phone: None,
            avatar: None,
            is_active: true,
            agent_profile,
            client_profile,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn is_verified_agent(&self) -> bool {
        self.agent_profile.as_ref().is_some_and(|p| p.is_verified)
    }
}

/// Public contact card embedded in property and inquiry responses.
#[derive(Debug, Serialize, Clone)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            avatar: u.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_starts_unverified() {
        let agent = User::new("Ada".into(), "Ada@Example.com ".into(), "hash".into(), Role::Agent);
        assert_eq!(agent.email, "ada@example.com");
        assert_eq!(agent.role(), Some(Role::Agent));
        assert!(agent.agent_profile.is_some());
        assert!(!agent.is_verified_agent());
        assert!(agent.client_profile.is_none());
    }

    #[test]
    fn test_new_client_has_client_profile_only() {
        let client = User::new("Cy".into(), "cy@example.com".into(), "hash".into(), Role::Client);
        assert!(client.client_profile.is_some());
        assert!(client.agent_profile.is_none());
        assert!(client.is_active);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("Cy".into(), "cy@example.com".into(), "secret-hash".into(), Role::Client);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "client");
    }
}
