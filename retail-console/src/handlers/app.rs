use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use console_core::models::User;
use console_core::session::SessionState;
use serde::Serialize;

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    pub next: String,
}

#[derive(Template)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub role_label: &'static str,
}

pub async fn index() -> impl IntoResponse {
    Redirect::to("/dashboard")
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn unauthorized_page(State(state): State<AppState>) -> impl IntoResponse {
    let role_label = state
        .session
        .current()
        .role()
        .map(|role| role.label())
        .unwrap_or_default();

    (StatusCode::FORBIDDEN, UnauthorizedTemplate { role_label })
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_label: Option<&'static str>,
    pub permissions: &'static [&'static str],
}

impl From<SessionState> for SessionStatus {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Anonymous => Self {
                state: "anonymous",
                user: None,
                role_label: None,
                permissions: &[],
            },
            SessionState::Loading => Self {
                state: "loading",
                user: None,
                role_label: None,
                permissions: &[],
            },
            SessionState::Authenticated(user) => Self {
                state: "authenticated",
                role_label: Some(user.role.label()),
                permissions: user.role.permissions(),
                user: Some(user),
            },
        }
    }
}

/// Current session state, polled by the loading page.
pub async fn session_status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session.current().into())
}
