use thiserror::Error;

/// Failures reported by an [`AuthBackend`](crate::AuthBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend rejected the token (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated; run `medge auth login`")]
    NotAuthenticated,

    #[error("no refresh token stored; run `medge auth login`")]
    MissingRefreshToken,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("token store error: {0}")]
    TokenStore(String),

    /// A newer login, logout, or shutdown replaced this operation's result.
    #[error("operation superseded by a newer authentication change")]
    Superseded,

    #[error("{0}")]
    Other(String),
}
