//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] arluxe_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Magic-link token is unknown or already used.
    #[error("invalid or expired magic link")]
    InvalidOrExpiredLink,

    /// Magic-link token is past its expiry.
    #[error("magic link expired")]
    LinkExpired,

    /// `FRONTEND_URL` cannot be turned into a login link.
    #[error("invalid frontend url: {0}")]
    InvalidLinkBase(#[from] url::ParseError),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
