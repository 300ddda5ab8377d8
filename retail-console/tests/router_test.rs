//! Router tests for the console pages and the route guard.

mod common;

use axum::http::StatusCode;
use common::{body_text, location, TestApp};
use console_core::access::Role;
use console_core::session::{MemoryTokenStore, SessionState};

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login_with_return_path() {
    let app = TestApp::new();

    let response = app.get("/inventory").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Finventory");

    // Open pages still require a session
    let response = app.get("/profile").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fprofile");
}

#[tokio::test]
async fn cashier_on_admin_page_is_forbidden_not_unauthenticated() {
    let app = TestApp::new();
    app.login_as("cashier").await;

    let response = app.get("/users").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/unauthorized");

    let response = app.get("/unauthorized").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_text(response).await.contains("Cashier"));
}

#[tokio::test]
async fn allowed_page_renders_filtered_menu() {
    let app = TestApp::new();
    app.login_as("cashier").await;

    let response = app.get("/pos").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Point of Sale"));
    assert!(body.contains("href=\"/customers\""));
    assert!(!body.contains("href=\"/users\""));
    assert!(!body.contains("href=\"/inventory\""));
}

#[tokio::test]
async fn profile_lists_role_permissions() {
    let app = TestApp::new();
    app.login_as("clerk").await;

    let response = app.get("/profile").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(Role::StockClerk.label()));
    for permission in Role::StockClerk.permissions() {
        assert!(body.contains(permission), "missing {}", permission);
    }
    assert!(body.contains("Store 12"));
}

#[tokio::test]
async fn loading_session_shows_placeholder() {
    let app = TestApp::with_tokens(MemoryTokenStore::with_token("token-manager"));
    let _pending = app.session.begin_restore().await.unwrap();
    assert_eq!(app.session.current(), SessionState::Loading);

    let response = app.get("/reports").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Restoring your session"));

    let response = app.get("/session").await;
    let status: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(status["state"], "loading");
}

#[tokio::test]
async fn restored_session_renders_page() {
    let app = TestApp::with_tokens(MemoryTokenStore::with_token("token-manager"));
    app.session.restore_session().await;

    let response = app.get("/reports").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/session").await;
    let status: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(status["state"], "authenticated");
    assert_eq!(status["user"]["role"], "MANAGER");
    assert_eq!(status["role_label"], "Manager");
}

#[tokio::test]
async fn htmx_login_redirects_to_requested_page() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/login",
            "username=manager&password=password&next=%2Freports",
            true,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["hx-redirect"], "/reports");
    assert_eq!(app.session.current().role(), Some(Role::Manager));
}

#[tokio::test]
async fn login_ignores_offsite_return_path() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/login",
            "username=admin&password=password&next=https%3A%2F%2Fevil.example",
            false,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn login_with_control_characters_in_return_path_lands_on_dashboard() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/login",
            "username=admin&password=password&next=%2Fpos%0Aevil",
            false,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert_eq!(app.session.current().role(), Some(Role::Admin));

    let response = app
        .post_form(
            "/login",
            "username=admin&password=password&next=%2F%09%2Fevil.example",
            true,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["hx-redirect"], "/dashboard");
}

#[tokio::test]
async fn signed_in_login_page_ignores_header_breaking_return_path() {
    let app = TestApp::new();
    app.login_as("manager").await;

    let response = app.get("/login?next=%2Fpos%0D%0Aevil").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn failed_login_reports_reason_and_keeps_session_empty() {
    let app = TestApp::new();

    let response = app
        .post_form("/login", "username=manager&password=wrong", true)
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Invalid username or password"));
    assert_eq!(app.session.current(), SessionState::Anonymous);

    let response = app
        .post_form("/login", "username=offline&password=password", true)
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.session.current(), SessionState::Anonymous);
}

#[tokio::test]
async fn empty_login_form_is_rejected_before_backend() {
    let app = TestApp::new();

    let response = app.post_form("/login", "username=&password=", true).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.session.current(), SessionState::Anonymous);
}

#[tokio::test]
async fn logout_returns_to_login_and_guards_again() {
    let app = TestApp::new();
    app.login_as("admin").await;
    assert_eq!(app.get("/users").await.status(), StatusCode::OK);

    let response = app.post_form("/logout", "", true).await;
    assert_eq!(response.headers()["hx-redirect"], "/login");
    assert!(app.session.current_user().is_none());

    let response = app.get("/users").await;
    assert_eq!(location(&response), "/login?next=%2Fusers");
}

#[tokio::test]
async fn login_page_skips_form_when_signed_in() {
    let app = TestApp::new();
    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);

    app.login_as("manager").await;
    let response = app.get("/login?next=%2Femployees").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employees");
}
