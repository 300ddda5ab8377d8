//! Test helpers for session store tests.
//!
//! Provides a scripted auth backend whose calls can be held open so tests can
//! interleave them with other session changes.

#![allow(dead_code)]

use async_trait::async_trait;
use console_core::access::Role;
use console_core::models::{Credentials, User};
use console_core::secrecy::{ExposeSecret, Secret};
use console_core::session::{AuthBackend, AuthError, Authenticated};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{oneshot, Mutex, Notify};

pub fn user(id: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: format!("Operator {}", id),
        email: format!("{}@market.example", id),
        role,
        department: None,
    }
}

pub fn token_for(username: &str) -> String {
    format!("token-{}", username)
}

pub struct FakeBackend {
    accounts: Vec<(String, String, User)>,
    restore_error: Mutex<Option<fn() -> AuthError>>,
    held: Mutex<Option<oneshot::Receiver<()>>>,
    pub entered: Notify,
    pub restore_calls: AtomicUsize,
    pub revoked: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            accounts: vec![
                ("ana".to_string(), "s3cret".to_string(), user("ana", Role::Manager)),
                ("bo".to_string(), "tills".to_string(), user("bo", Role::Cashier)),
                ("cy".to_string(), "boxes".to_string(), user("cy", Role::StockClerk)),
            ],
            restore_error: Mutex::new(None),
            held: Mutex::new(None),
            entered: Notify::new(),
            restore_calls: AtomicUsize::new(0),
            revoked: Mutex::new(Vec::new()),
        }
    }

    /// Make the next backend call wait until the returned sender fires (or drops).
    pub async fn hold_next_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.held.lock().await = Some(rx);
        tx
    }

    pub async fn fail_restore_with(&self, error: fn() -> AuthError) {
        *self.restore_error.lock().await = Some(error);
    }

    async fn gate(&self) {
        let held = self.held.lock().await.take();
        self.entered.notify_one();
        if let Some(rx) = held {
            let _ = rx.await;
        }
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated, AuthError> {
        self.gate().await;
        self.accounts
            .iter()
            .find(|(name, password, _)| {
                *name == credentials.username && password == credentials.password.expose_secret()
            })
            .map(|(name, _, user)| Authenticated {
                user: user.clone(),
                token: Secret::new(token_for(name)),
            })
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn restore_session(&self, token: &Secret<String>) -> Result<User, AuthError> {
        self.restore_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await;
        if let Some(error) = *self.restore_error.lock().await {
            return Err(error());
        }
        self.accounts
            .iter()
            .find(|(name, _, _)| token_for(name) == *token.expose_secret())
            .map(|(_, _, user)| user.clone())
            .ok_or(AuthError::SessionExpired)
    }

    async fn revoke(&self, token: &Secret<String>) -> Result<(), AuthError> {
        self.revoked
            .lock()
            .await
            .push(token.expose_secret().clone());
        Ok(())
    }
}
