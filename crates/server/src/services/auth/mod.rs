//! Authentication service.
//!
//! Password login and account registration for staff users. Hashes use
//! Argon2id; stored hashes carry their own salt and parameters.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use apotheca_core::{Email, Phone, Role};

use crate::db::{Store, StoreError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 7;

/// Authentication service.
///
/// Handles staff registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Register a new staff account.
    ///
    /// Email uniqueness is checked by a read before the insert; two racing
    /// registrations can both pass the check (accepted, see design notes).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `InvalidPhone` on malformed
    /// input, `AuthError::WeakPassword` if the password is too short, and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        contact: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let contact = Phone::parse(contact)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let id = self
            .users
            .create(name, &email, &password_hash, role, &contact)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(User {
            id,
            name: name.to_owned(),
            email,
            role,
            contact,
        })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// the password doesn't verify.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("qwerty12").unwrap();
        assert!(verify_password("qwerty12", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("qwerty12").unwrap();
        let b = hash_password("qwerty12").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("abcdefg").is_ok());
        assert!(matches!(
            validate_password("abcdef"),
            Err(AuthError::WeakPassword(_))
        ));
    }
}
