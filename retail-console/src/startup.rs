use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use console_core::access::MENU;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::{health_check, index, session_status, unauthorized_page},
    auth::{cancel_login_handler, login_handler, login_page, logout_handler},
    metrics::metrics,
    pages::{module_page, profile_page},
};
use crate::middleware::{
    guard::{route_guard, RouteGuard},
    metrics::metrics_middleware,
    request_id::{request_id_middleware, REQUEST_ID_HEADER},
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/session", get(session_status))
        .route("/login", get(login_page).post(login_handler))
        .route("/login/cancel", post(cancel_login_handler))
        .route("/logout", get(logout_handler).post(logout_handler))
        .route("/unauthorized", get(unauthorized_page))
        .route(
            "/profile",
            get(profile_page).layer(from_fn_with_state(
                RouteGuard::open(state.session.clone()),
                route_guard,
            )),
        );

    // Each menu page is guarded by its own entry's allow-list
    for entry in MENU {
        router = router.route(
            entry.path,
            get(module_page).layer(from_fn_with_state(
                RouteGuard::new(state.session.clone(), entry.allowed_roles),
                route_guard,
            )),
        );
    }

    router
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
