use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked")]
    AccountLocked,

    #[error("Session expired")]
    SessionExpired,

    #[error("Auth service returned unknown role: {0}")]
    UnknownRole(String),

    #[error("Auth service unreachable: {0}")]
    Network(String),

    #[error("Auth service error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Superseded by a newer session change")]
    Superseded,

    #[error("Token storage error: {0}")]
    Storage(#[from] TokenStoreError),
}

impl AuthError {
    /// The backend looked at the request and said no, as opposed to not answering.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::AccountLocked
                | AuthError::SessionExpired
                | AuthError::UnknownRole(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
