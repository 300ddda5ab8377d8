use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub const HX_REQUEST: &str = "hx-request";
pub const HX_REDIRECT: &str = "hx-redirect";

/// Used when a location cannot be sent as a header value.
const FALLBACK_LOCATION: &str = "/";

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

/// Redirect that works for both HTMX fragment requests and full page loads.
pub fn redirect(headers: &HeaderMap, location: &str) -> Response {
    let value = HeaderValue::from_str(location).unwrap_or_else(|_| {
        tracing::warn!("Redirect target is not a valid header value, using fallback");
        HeaderValue::from_static(FALLBACK_LOCATION)
    });

    if is_htmx(headers) {
        (StatusCode::OK, [(HX_REDIRECT, value)], "").into_response()
    } else {
        (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response()
    }
}
