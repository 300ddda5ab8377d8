//! Collaborators the session store depends on.

use super::error::{AuthError, TokenStoreError};
use crate::models::{Credentials, User};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use tokio::sync::Mutex;

/// Successful login: the operator plus the opaque session token to persist.
#[derive(Debug)]
pub struct Authenticated {
    pub user: User,
    pub token: Secret<String>,
}

/// Remote auth API. Timeouts and retries are the implementor's business.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated, AuthError>;

    async fn restore_session(&self, token: &Secret<String>) -> Result<User, AuthError>;

    async fn revoke(&self, token: &Secret<String>) -> Result<(), AuthError>;
}

/// Durable slot for the session token. Survives restarts; holds at most one token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Secret<String>>, TokenStoreError>;

    async fn save(&self, token: &Secret<String>) -> Result<(), TokenStoreError>;

    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<Secret<String>>, TokenStoreError> {
        Ok(self.token.lock().await.clone().map(Secret::new))
    }

    async fn save(&self, token: &Secret<String>) -> Result<(), TokenStoreError> {
        *self.token.lock().await = Some(token.expose_secret().clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().await = None;
        Ok(())
    }
}
