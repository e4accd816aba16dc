//! Cross-cutting error types for MarketEdge clients.
//!
//! Domain-specific errors (`AuthError`, `AccessError`, `ConfigError`) live in
//! their own crates. The binary converges them through `anyhow`.

use thiserror::Error;

/// Errors raised while parsing or validating core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An application identifier that no known application matches.
    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    /// A role name that no known role matches.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
