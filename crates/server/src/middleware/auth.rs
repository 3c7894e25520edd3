//! Authentication middleware and extractors.
//!
//! Two independent gates protect every operation: [`RequireAuth`] checks
//! that the session carries a logged-in user, and [`require_role`] checks
//! that the user's role is in the operation's allowed set.

use axum::{
    extract::FromRequestParts,
    http::{header::REFERER, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use apotheca_core::Role;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, the request is redirected to the login page
/// with a notice.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is logged in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to("/?error=login_required").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session is placed in extensions by SessionManagerLayer.
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(user))
    }
}

/// Extractor for the request's Referer header, used to send permission
/// violations back where they came from.
pub struct Referer(pub Option<String>);

impl<S> FromRequestParts<S> for Referer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let referer = parts
            .headers
            .get(REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Ok(Self(referer))
    }
}

/// Check that the user's role is in the operation's allowed set.
///
/// A violation redirects to the referring page, or the dashboard when
/// there is none, carrying a permission-denied notice.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the role is not allowed.
pub fn require_role(
    user: &CurrentUser,
    allowed: &[Role],
    referer: Option<&str>,
) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    tracing::warn!(user = %user.email, role = %user.role, "Permission denied");
    let base = referer.unwrap_or("/dashboard");
    let back = if base.contains('?') {
        format!("{base}&error=permission")
    } else {
        format!("{base}?error=permission")
    };
    Err(AppError::Forbidden { back })
}

/// Helper to set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the whole session (logout drops the user and the cart).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apotheca_core::{Email, UserId};

    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("staff@pharmacy.example").unwrap(),
            name: "Staff".to_owned(),
            role,
        }
    }

    #[test]
    fn test_allowed_role_passes() {
        let user = user(Role::Pharmacist);
        assert!(require_role(&user, &[Role::Admin, Role::Pharmacist], None).is_ok());
    }

    #[test]
    fn test_denied_role_redirects_to_referer() {
        let user = user(Role::Cashier);
        let err = require_role(&user, &[Role::Admin], Some("/products")).unwrap_err();
        match err {
            AppError::Forbidden { back } => assert_eq!(back, "/products?error=permission"),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_denied_role_falls_back_to_dashboard() {
        let user = user(Role::Cashier);
        let err = require_role(&user, &[Role::Admin], None).unwrap_err();
        match err {
            AppError::Forbidden { back } => assert_eq!(back, "/dashboard?error=permission"),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
