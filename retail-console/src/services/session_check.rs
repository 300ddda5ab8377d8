//! Background session check

use console_core::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Periodically re-check the operator's session with the backend so a token
/// revoked elsewhere logs the console out.
pub fn spawn_session_check(session: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick fires immediately; restore already covers start-up.
        interval.tick().await;

        loop {
            interval.tick().await;
            let state = session.revalidate().await;
            tracing::debug!(authenticated = state.user().is_some(), "Session check finished");
        }
    })
}
