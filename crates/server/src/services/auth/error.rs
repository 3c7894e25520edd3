//! Authentication error types.

use thiserror::Error;

use apotheca_core::{EmailError, PhoneError};

use crate::db::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password doesn't match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account already exists with this email.
    #[error("account already exists")]
    UserAlreadyExists,

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Contact phone format is invalid.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] StoreError),
}
