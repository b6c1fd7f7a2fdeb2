#![allow(dead_code)]

use metronest::{
    api::router::create_router,
    config::Config,
    domain::{models::chat::ChatMessage, ports::LlmService, services::bootstrap},
    error::AppError,
    infra::factory::{run_migrations, state_from_pool},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@metronest.test";
pub const ADMIN_PASSWORD: &str = "admin-password-123";
pub const PASSWORD: &str = "password123";

pub enum MockLlmService {
    Reply(String),
    Fail,
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(
        &self,
        _api_key: &str,
        _messages: &[ChatMessage],
        _system_instruction: &str
    ) -> Result<String, AppError> {
        match self {
            MockLlmService::Reply(text) => Ok(text.clone()),
            MockLlmService::Fail => Err(AppError::InternalWithMsg("mock provider down".into())),
        }
    }
}

#[derive(Clone)]
pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// No AI key configured: chat and insights use the built-in fallbacks.
    pub async fn new() -> Self {
        Self::build(None).await
    }

    pub async fn with_llm(llm: MockLlmService) -> Self {
        Self::build(Some(llm)).await
    }

    async fn build(llm: Option<MockLlmService>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_migrations(&pool).await;

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            gemini_api_key: llm.as_ref().map(|_| "test-key".to_string()),
            gemini_model: "gemini-test".to_string(),
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
        };

        let mut state = state_from_pool(pool.clone(), &config);
        if let Some(llm) = llm {
            state.llm_service = Arc::new(llm);
        }
        bootstrap::run(&state).await.expect("Failed to seed test db");

        let state = Arc::new(state);
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request, authenticating with the cookie + CSRF pair when given.
    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let (status, body) = self.send("POST", "/api/auth/login", None, Some(json!({
            "email": email,
            "password": password
        }))).await;

        if !status.is_success() {
            panic!("Login failed in test helper: status {} body {}", status, body);
        }
        auth_from_body(&body)
    }

    pub async fn admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn register_client(&self, name: &str, email: &str) -> AuthHeaders {
        let (status, body) = self.send("POST", "/api/auth/register", None, Some(json!({
            "name": name,
            "email": email,
            "password": PASSWORD
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "client registration failed: {}", body);
        auth_from_body(&body)
    }

    /// Registers an agent and returns its id; the account is still pending.
    pub async fn register_agent(&self, name: &str, email: &str) -> String {
        let (status, body) = self.send("POST", "/api/auth/register", None, Some(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "role": "agent",
            "agent_profile": { "license_number": "LIC-1", "agency": "Metro Realty" }
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "agent registration failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn verified_agent(&self, name: &str, email: &str) -> AuthHeaders {
        let agent_id = self.register_agent(name, email).await;
        let admin = self.admin().await;
        let (status, _) = self.send("PUT", &format!("/api/admin/agents/{}/approve", agent_id), Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        self.login(email, PASSWORD).await
    }

    pub async fn create_property(&self, agent: &AuthHeaders, title: &str, city: &str, price: f64) -> String {
        let (status, body) = self.send("POST", "/api/agent/properties", Some(agent), Some(json!({
            "title": title,
            "description": "A lovely place",
            "price": price,
            "property_type": "House",
            "address": "1 Main St",
            "city": city,
            "bedrooms": 3,
            "bathrooms": 2
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "property creation failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

fn auth_from_body(body: &Value) -> AuthHeaders {
    AuthHeaders {
        access_token: body["data"]["access_token"].as_str().expect("No access_token in body").to_string(),
        csrf_token: body["data"]["csrf_token"].as_str().expect("No csrf_token in body").to_string(),
        user_id: body["data"]["user"]["id"].as_str().expect("No user id in body").to_string(),
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
