pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod services;
pub mod startup;
pub mod utils;

use console_core::session::SessionStore;
use std::sync::Arc;

/// Shared application state: the workstation's single operator session.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
}

impl AppState {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}
