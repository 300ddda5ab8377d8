//! Route guard decision.
//!
//! Authentication is checked before the role, so an open page still sends an
//! anonymous visitor to the login page rather than rendering.

use crate::access::{is_authorized, Role};
use crate::models::User;
use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restore still running; show a placeholder.
    Loading,
    RedirectLogin,
    /// Logged in, but the role is not on the page's allow-list.
    RedirectForbidden,
    Render(User),
}

pub fn evaluate(state: &SessionState, required_roles: &[Role]) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Loading,
        SessionState::Anonymous => GuardDecision::RedirectLogin,
        SessionState::Authenticated(user) if is_authorized(Some(user.role), required_roles) => {
            GuardDecision::Render(user.clone())
        }
        SessionState::Authenticated(_) => GuardDecision::RedirectForbidden,
    }
}

/// Whether `path` may be used as a post-login redirect target: a local
/// absolute path, not protocol-relative and without a scheme.
///
/// Only printable ASCII other than `\` is accepted. Browsers strip tabs and
/// newlines and treat `\` as `/`, so those could turn `/` into `//`.
pub fn is_safe_return_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains("://")
        && path.chars().all(|c| c.is_ascii_graphic() && c != '\\')
        && path != LOGIN_PATH
}
