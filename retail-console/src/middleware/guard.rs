use crate::handlers::app::LoadingTemplate;
use crate::services::metrics::record_guard_decision;
use crate::utils::htmx::redirect;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use console_core::access::Role;
use console_core::guard::{evaluate, GuardDecision, LOGIN_PATH, UNAUTHORIZED_PATH};
use console_core::models::User;
use console_core::session::SessionStore;
use std::sync::Arc;

/// Guard configuration for one page: the session to consult and the page's allow-list.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
    required_roles: &'static [Role],
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>, required_roles: &'static [Role]) -> Self {
        Self {
            session,
            required_roles,
        }
    }

    /// Any logged-in operator.
    pub fn open(session: Arc<SessionStore>) -> Self {
        Self::new(session, &[])
    }
}

/// Operator admitted by the guard, available to the page handler.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}

pub fn login_location(next: &str) -> String {
    format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next))
}

pub async fn route_guard(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let state = guard.session.current();
    match evaluate(&state, guard.required_roles) {
        GuardDecision::Loading => {
            record_guard_decision("loading");
            LoadingTemplate { next: target }.into_response()
        }
        GuardDecision::RedirectLogin => {
            record_guard_decision("login");
            redirect(request.headers(), &login_location(&target))
        }
        GuardDecision::RedirectForbidden => {
            record_guard_decision("forbidden");
            tracing::warn!(
                path = %target,
                role = ?state.role(),
                "Operator not allowed on page"
            );
            redirect(request.headers(), UNAUTHORIZED_PATH)
        }
        GuardDecision::Render(user) => {
            record_guard_decision("render");
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
    }
}
