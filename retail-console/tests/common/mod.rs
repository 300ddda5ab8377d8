//! Test helpers for retail-console router tests.
//!
//! Builds the router over an in-memory token store and a canned auth backend,
//! so no store server is needed.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use console_core::access::Role;
use console_core::models::{Credentials, User};
use console_core::session::{
    AuthBackend, AuthError, Authenticated, MemoryTokenStore, SessionStore,
};
use http_body_util::BodyExt;
use retail_console::{startup::build_router, AppState};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use tower::util::ServiceExt;

pub struct CannedBackend;

fn operator_for(username: &str) -> Option<User> {
    let role = match username {
        "admin" => Role::Admin,
        "manager" => Role::Manager,
        "cashier" => Role::Cashier,
        "clerk" => Role::StockClerk,
        _ => return None,
    };
    Some(User {
        id: format!("{}-1", username),
        name: format!("Test {}", username),
        email: format!("{}@market.example", username),
        role,
        department: Some("Store 12".to_string()),
    })
}

#[async_trait]
impl AuthBackend for CannedBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated, AuthError> {
        if credentials.username == "offline" {
            return Err(AuthError::Network("connection refused".to_string()));
        }
        if credentials.password.expose_secret() != "password" {
            return Err(AuthError::InvalidCredentials);
        }
        let user = operator_for(&credentials.username).ok_or(AuthError::InvalidCredentials)?;
        Ok(Authenticated {
            token: Secret::new(format!("token-{}", credentials.username)),
            user,
        })
    }

    async fn restore_session(&self, token: &Secret<String>) -> Result<User, AuthError> {
        token
            .expose_secret()
            .strip_prefix("token-")
            .and_then(operator_for)
            .ok_or(AuthError::SessionExpired)
    }

    async fn revoke(&self, _token: &Secret<String>) -> Result<(), AuthError> {
        Ok(())
    }
}

pub struct TestApp {
    pub session: Arc<SessionStore>,
    pub tokens: Arc<MemoryTokenStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new())
    }

    pub fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let tokens = Arc::new(tokens);
        let session = Arc::new(SessionStore::new(Arc::new(CannedBackend), tokens.clone()));
        let router = build_router(AppState::new(session.clone()));
        Self {
            session,
            tokens,
            router,
        }
    }

    pub async fn login_as(&self, username: &str) {
        self.session
            .login(&Credentials::new(username, "password"))
            .await
            .expect("test login should succeed");
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, form: &str, htmx: bool) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
