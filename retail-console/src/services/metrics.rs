use crate::error::AppError;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static LOGIN_ATTEMPTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GUARD_DECISIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;
    let request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;
    let login_attempts = IntCounterVec::new(
        Opts::new("console_login_attempts_total", "Operator login attempts by outcome"),
        &["outcome"],
    )?;
    let guard_decisions = IntCounterVec::new(
        Opts::new("console_guard_decisions_total", "Route guard decisions"),
        &["decision"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;
    registry.register(Box::new(login_attempts.clone()))?;
    registry.register(Box::new(guard_decisions.clone()))?;

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = LOGIN_ATTEMPTS_TOTAL.set(login_attempts);
    let _ = GUARD_DECISIONS_TOTAL.set(guard_decisions);
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: &str, seconds: f64) {
    let labels = [method, path, status];
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&labels).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram.with_label_values(&labels).observe(seconds);
    }
}

pub fn record_login(outcome: &str) {
    if let Some(counter) = LOGIN_ATTEMPTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_guard_decision(decision: &str) {
    if let Some(counter) = GUARD_DECISIONS_TOTAL.get() {
        counter.with_label_values(&[decision]).inc();
    }
}

pub fn get_metrics() -> Result<String, AppError> {
    let registry = REGISTRY
        .get()
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("metrics registry not initialized")))?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| AppError::InternalError(e.into()))
}
