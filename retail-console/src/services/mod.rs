pub mod auth_client;
pub mod metrics;
pub mod session_check;
pub mod token_file;

pub use auth_client::AuthClient;
pub use session_check::spawn_session_check;
pub use token_file::FileTokenStore;
