use crate::services::metrics::record_login;
use crate::utils::htmx::redirect;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use console_core::guard::{is_safe_return_path, LOGIN_PATH};
use console_core::models::Credentials;
use console_core::session::AuthError;
use serde::Deserialize;
use validator::Validate;

const DEFAULT_LANDING: &str = "/dashboard";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub next: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "Enter your username"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "Enter your password"))]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

fn landing_for(next: Option<&str>) -> &str {
    next.filter(|path| is_safe_return_path(path))
        .unwrap_or(DEFAULT_LANDING)
}

fn error_fragment(status: StatusCode, message: &str) -> Response {
    (
        status,
        Html(format!("<p class='text-red-500 text-sm'>{}</p>", message)),
    )
        .into_response()
}

/// Status, message and metric label for a failed login.
fn login_failure(error: &AuthError) -> (StatusCode, &'static str, &'static str) {
    match error {
        AuthError::InvalidCredentials => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid username or password",
            "invalid_credentials",
        ),
        AuthError::AccountLocked => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "This account is locked. Ask a manager to unlock it.",
            "locked",
        ),
        AuthError::UnknownRole(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "This account has no console role assigned",
            "unknown_role",
        ),
        AuthError::SessionExpired => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Your session expired. Please sign in again.",
            "expired",
        ),
        AuthError::Superseded => (
            StatusCode::CONFLICT,
            "Sign-in was cancelled",
            "cancelled",
        ),
        AuthError::Network(_) | AuthError::Server { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "The store server is unavailable. Try again shortly.",
            "unavailable",
        ),
        AuthError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not save the session on this workstation",
            "storage",
        ),
    }
}

pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Response {
    let next = landing_for(query.next.as_deref()).to_string();

    if state.session.current_user().is_some() {
        return redirect(&headers, &next);
    }

    LoginTemplate { next }.into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<LoginRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        record_login("invalid_form");
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Enter your username and password".to_string());
        return error_fragment(StatusCode::UNPROCESSABLE_ENTITY, &message);
    }

    let credentials = Credentials::new(payload.username.trim(), payload.password);

    match state.session.login(&credentials).await {
        Ok(user) => {
            record_login("success");
            tracing::info!(
                user_id = %user.id,
                role = %user.role,
                "Operator signed in to console"
            );
            redirect(&headers, landing_for(payload.next.as_deref()))
        }
        Err(e) => {
            let (status, message, outcome) = login_failure(&e);
            record_login(outcome);
            error_fragment(status, message)
        }
    }
}

/// Abandon a sign-in still waiting on the backend.
pub async fn cancel_login_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.session.cancel_pending().await;
    redirect(&headers, LOGIN_PATH)
}

pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.session.logout().await;
    redirect(&headers, LOGIN_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_falls_back_for_unsafe_targets() {
        assert_eq!(landing_for(Some("/inventory")), "/inventory");
        assert_eq!(landing_for(Some("//evil.example")), DEFAULT_LANDING);
        assert_eq!(landing_for(Some("https://evil.example")), DEFAULT_LANDING);
        assert_eq!(landing_for(None), DEFAULT_LANDING);
        assert_eq!(landing_for(Some("/pos\nevil")), DEFAULT_LANDING);
        assert_eq!(landing_for(Some("/\t/evil.example")), DEFAULT_LANDING);
    }

    #[test]
    fn test_backend_outage_is_distinguished_from_rejection() {
        let (status, _, outcome) = login_failure(&AuthError::InvalidCredentials);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(outcome, "invalid_credentials");

        let (status, _, outcome) =
            login_failure(&AuthError::Network("connection refused".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(outcome, "unavailable");
    }
}
