pub mod guard;
pub mod metrics;
pub mod request_id;

pub use guard::{route_guard, CurrentUser, RouteGuard};
