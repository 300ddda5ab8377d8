//! console-core: access policy and operator session lifecycle for the retail console.
pub mod access;
pub mod guard;
pub mod models;
pub mod session;

pub use secrecy;
