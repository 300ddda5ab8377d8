pub mod error;
pub mod ports;
pub mod store;

pub use error::{AuthError, TokenStoreError};
pub use ports::{AuthBackend, Authenticated, MemoryTokenStore, TokenStore};
pub use store::{PendingRestore, SessionState, SessionStore};
