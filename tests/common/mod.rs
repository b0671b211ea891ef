#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use todo_web::auth::{hash_password, Identity, SessionKeys, SESSION_COOKIE};
use todo_web::config::AppConfig;
use todo_web::database::{MemoryStore, UserStore};
use todo_web::{router, AppState};

/// The full application over an in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub sessions: SessionKeys,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Value of the session cookie this response set, if any.
    /// An empty string means the cookie was cleared.
    pub fn session(&self) -> Option<String> {
        let raw = self.set_cookie.as_deref()?;
        let pair = raw.split(';').next()?;
        let value = pair.strip_prefix(&format!("{}=", SESSION_COOKIE))?;
        Some(value.to_string())
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionKeys::from_config(&AppConfig::development().security)
            .expect("development config has a session secret");
        let router = router(AppState::new(store.clone(), sessions.clone()));
        Self { router, store, sessions }
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> Result<TestResponse> {
        let mut request = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = session {
            request = request.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        self.send(request.body(Body::empty())?).await
    }

    pub async fn post(&self, path: &str, fields: &[(&str, &str)], session: Option<&str>) -> Result<TestResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = session {
            request = request.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        self.send(request.body(Body::from(body))?).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(SESSION_COOKIE))
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            location,
            set_cookie,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }

    /// Sign up through the real endpoint and return the session token
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<String> {
        let response = self
            .post(
                "/signup",
                &[("username", username), ("password1", password), ("password2", password)],
                None,
            )
            .await?;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "sign-up failed: {}", response.body);
        response
            .session()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow::anyhow!("sign-up did not set a session cookie"))
    }

    /// Create an account directly in the store, bypassing HTTP
    pub async fn identity(&self, username: &str) -> Result<Identity> {
        let user = self
            .store
            .create_user(username, &hash_password("password").await?)
            .await?;
        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }
}

/// Pull todo ids out of rendered list links, in page order
pub fn todo_ids(body: &str) -> Vec<Uuid> {
    body.split(r#"href="/todos/"#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect()
}
