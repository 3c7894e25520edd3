//! Unified error handling for the server.
//!
//! Route handlers return `Result<T, AppError>`. User-input problems are
//! recovered locally in the handlers (re-rendered forms, redirect
//! notices); whatever reaches this type is either a navigation outcome
//! (login redirect, permission redirect) or a fault that must not leak
//! internals to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data layer contract violation or database failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session read/write failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Not logged in; sent back to the login page.
    #[error("unauthorized")]
    Unauthorized,

    /// Logged in but the role doesn't allow the operation; sent back to
    /// the carried location with a permission notice.
    #[error("forbidden")]
    Forbidden {
        /// Where the redirect lands (referrer or the dashboard).
        back: String,
    },

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Operator detail goes to the log; the client sees a generic
        // failure for anything server-side.
        if matches!(self, Self::Store(_) | Self::Session(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        match self {
            Self::Unauthorized => Redirect::to("/?error=login_required").into_response(),
            Self::Forbidden { back } => Redirect::to(&back).into_response(),
            Self::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("Not found: {what}")).into_response()
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Self::Auth(_) => {
                // Auth flows handle their own recovery; anything that
                // escapes here is unexpected.
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = AppError::Internal("connection string leaked".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_maps_to_500() {
        let err = AppError::Store(StoreError::UnsafeOperation("update on users".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert!(response.status().is_redirection());
    }

    #[test]
    fn test_forbidden_redirects_back() {
        let response = AppError::Forbidden {
            back: "/dashboard?error=permission".to_string(),
        }
        .into_response();
        assert!(response.status().is_redirection());
    }
}
