//! Operator session store.
//!
//! Holds the one authenticated operator for this process. Every state-changing
//! call draws a ticket when it starts; its result is committed only if no call
//! with a newer ticket has committed first. A login that resolves after a
//! logout issued later is therefore dropped instead of resurrecting the session.

use super::error::AuthError;
use super::ports::{AuthBackend, Authenticated, TokenStore};
use crate::access::Role;
use crate::models::{Credentials, User};
use secrecy::Secret;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Loading,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// A restore that has entered `Loading` and still has to ask the backend.
#[derive(Debug)]
pub struct PendingRestore {
    ticket: u64,
    token: Secret<String>,
}

pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    next_ticket: AtomicU64,
    /// Ticket of the last committed change. Held while committing.
    committed: Mutex<u64>,
    restore_attempted: AtomicBool,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AuthBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            backend,
            tokens,
            state,
            next_ticket: AtomicU64::new(0),
            committed: Mutex::new(0),
            restore_attempted: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Verify credentials with the backend and make the operator current.
    ///
    /// Nothing is changed on failure. Returns [`AuthError::Superseded`] when a
    /// newer logout, login or cancel committed while this call was in flight.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let ticket = self.ticket();
        tracing::debug!(ticket, username = %credentials.username, "Login started");

        let Authenticated { user, token } = self
            .backend
            .authenticate(credentials)
            .await
            .inspect_err(|e| {
                tracing::warn!(username = %credentials.username, error = %e, "Login failed");
            })?;

        let mut committed = self.committed.lock().await;
        if *committed > ticket {
            tracing::info!(ticket, user_id = %user.id, "Discarding stale login result");
            return Err(AuthError::Superseded);
        }

        self.tokens.save(&token).await?;
        *committed = ticket;
        self.state.send_replace(SessionState::Authenticated(user.clone()));

        tracing::info!(user_id = %user.id, role = %user.role, "Operator logged in");
        Ok(user)
    }

    /// Clear the session and revoke its token. Safe to call when logged out.
    pub async fn logout(&self) {
        let ticket = self.ticket();
        let token = self.clear_session(ticket, "logout").await;

        // Local state is already gone; revocation is best effort.
        if let Some(token) = token {
            match self.backend.revoke(&token).await {
                Ok(()) => tracing::info!("Session token revoked"),
                Err(e) => tracing::error!(error = %e, "Failed to revoke token during logout"),
            }
        }
    }

    /// Drop a session the backend no longer honours. No backend call.
    pub async fn expire(&self) {
        let ticket = self.ticket();
        self.clear_session(ticket, "expired").await;
    }

    /// Re-check the current session with the backend.
    ///
    /// A rejection expires the session. An unreachable backend leaves it in
    /// place. If the backend now reports a different role for the same
    /// operator, the stored user is updated. Does nothing when logged out or
    /// when a newer session change commits while the check is in flight.
    pub async fn revalidate(&self) -> SessionState {
        let ticket = self.ticket();
        let Some(current) = self.current_user() else {
            return self.current();
        };

        let token = match self.tokens.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::warn!(user_id = %current.id, "Session has no persisted token");
                self.clear_session(ticket, "expired").await;
                return self.current();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                return self.current();
            }
        };

        match self.backend.restore_session(&token).await {
            Ok(user) => {
                let committed = self.committed.lock().await;
                if *committed <= ticket {
                    self.state.send_if_modified(|state| match state {
                        SessionState::Authenticated(existing)
                            if existing.id == user.id && *existing != user =>
                        {
                            tracing::info!(user_id = %user.id, role = %user.role, "Operator details refreshed");
                            *existing = user;
                            true
                        }
                        _ => false,
                    });
                }
            }
            Err(e) if e.is_rejection() => {
                tracing::info!(user_id = %current.id, error = %e, "Backend rejected the session");
                self.clear_session(ticket, "expired").await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed, keeping session");
            }
        }

        self.current()
    }

    /// Discard any login or restore still in flight. A restore in progress
    /// leaves the store logged out.
    pub async fn cancel_pending(&self) {
        let ticket = self.ticket();
        let mut committed = self.committed.lock().await;
        if *committed > ticket {
            return;
        }
        *committed = ticket;
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
        tracing::debug!(ticket, "Pending session changes cancelled");
    }

    async fn clear_session(&self, ticket: u64, reason: &'static str) -> Option<Secret<String>> {
        let mut committed = self.committed.lock().await;
        if *committed > ticket {
            tracing::debug!(ticket, reason, "Session clear superseded");
            return None;
        }

        let token = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                None
            }
        };
        if let Err(e) = self.tokens.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted session token");
        }

        *committed = ticket;
        let changed = self.state.send_if_modified(|state| {
            if *state == SessionState::Anonymous {
                false
            } else {
                *state = SessionState::Anonymous;
                true
            }
        });
        if changed {
            tracing::info!(reason, "Operator session ended");
        }
        token
    }

    /// Start restoring the persisted session. Enters `Loading` and returns the
    /// pending restore when a token is on disk; otherwise stays logged out.
    /// Only the first call per store does anything.
    pub async fn begin_restore(&self) -> Option<PendingRestore> {
        if self.restore_attempted.swap(true, Ordering::SeqCst) {
            tracing::warn!("Session restore already attempted");
            return None;
        }
        let ticket = self.ticket();

        let token = match self.tokens.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No persisted session to restore");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                return None;
            }
        };

        let committed = self.committed.lock().await;
        if *committed > ticket {
            return None;
        }
        self.state.send_replace(SessionState::Loading);
        drop(committed);

        Some(PendingRestore { ticket, token })
    }

    /// Ask the backend for the operator behind the persisted token. Failure of
    /// any kind logs out quietly and forgets the token.
    pub async fn finish_restore(&self, pending: PendingRestore) -> SessionState {
        let PendingRestore { ticket, token } = pending;
        let outcome = self.backend.restore_session(&token).await;

        let mut committed = self.committed.lock().await;
        if *committed > ticket {
            tracing::debug!(ticket, "Discarding stale session restore");
            return self.current();
        }

        match outcome {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Session restored");
                self.state.send_replace(SessionState::Authenticated(user));
            }
            Err(e) => {
                tracing::info!(error = %e, "Session restore failed, continuing logged out");
                if let Err(e) = self.tokens.clear().await {
                    tracing::warn!(error = %e, "Failed to clear stale session token");
                }
                self.state.send_replace(SessionState::Anonymous);
            }
        }
        *committed = ticket;

        self.current()
    }

    pub async fn restore_session(&self) -> SessionState {
        match self.begin_restore().await {
            Some(pending) => self.finish_restore(pending).await,
            None => self.current(),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .field("next_ticket", &self.next_ticket.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
