//! Staff user repository.

use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use apotheca_core::{Email, Phone, Role, UserId};

use super::store::{Store, Value};
use super::{StoreError, parse_stored};
use crate::models::User;

/// Internal row type for user queries. The password column is only read
/// by [`UserRepository::get_password_hash`].
#[derive(Debug, FromRow)]
struct UserRow {
    user_id: i64,
    name: String,
    email: String,
    role: String,
    contact_info: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = parse_stored(&row.role, "role")?;
        let contact = Phone::parse(&row.contact_info).map_err(|e| {
            StoreError::DataCorruption(format!("invalid contact_info in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.user_id),
            name: row.name,
            email,
            role,
            contact,
        })
    }
}

fn map_row(row: &SqliteRow) -> Result<User, StoreError> {
    UserRow::from_row(row).map_err(StoreError::Database)?.try_into()
}

/// Repository for staff account database operations.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List every staff account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = self.store.read("users", None, None, false).await?;
        rows.iter().map(map_row).collect()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let rows = self
            .store
            .read("users", Some(&[("user_id", Value::from(id.as_i64()))]), None, false)
            .await?;
        rows.first().map(map_row).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let rows = self
            .store
            .read("users", Some(&[("email", Value::from(email.as_str()))]), None, false)
            .await?;
        rows.first().map(map_row).transpose()
    }

    /// Get a user and their stored password hash for login verification.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, StoreError> {
        let rows = self
            .store
            .read("users", Some(&[("email", Value::from(email.as_str()))]), None, false)
            .await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        use sqlx::Row as _;
        let hash: String = row.try_get("password").map_err(StoreError::Database)?;
        let user = map_row(row)?;
        Ok(Some((user, hash)))
    }

    /// Create a new staff account.
    ///
    /// Email uniqueness is enforced here with a pre-check read; there is
    /// no database constraint backing it, so two racing creates can both
    /// pass the check.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered,
    /// `StoreError::Database` for other failures.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
        contact: &Phone,
    ) -> Result<UserId, StoreError> {
        if self.get_by_email(email).await?.is_some() {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        let id = self
            .store
            .insert(
                "users",
                &["name", "email", "password", "role", "contact_info"],
                &[
                    Value::from(name),
                    Value::from(email.as_str()),
                    Value::from(password_hash),
                    Value::from(role.as_str()),
                    Value::from(contact.as_str()),
                ],
            )
            .await?;
        Ok(UserId::new(id))
    }

    /// Update a user's name, email, and contact number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    pub async fn update_contact(
        &self,
        id: UserId,
        name: &str,
        email: &Email,
        contact: &Phone,
    ) -> Result<(), StoreError> {
        let changed = self
            .store
            .update(
                "users",
                &[
                    ("name", Value::from(name)),
                    ("email", Value::from(email.as_str())),
                    ("contact_info", Value::from(contact.as_str())),
                ],
                &[("user_id", Value::from(id.as_i64()))],
            )
            .await?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete a staff account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    pub async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let removed = self
            .store
            .delete("users", &[("user_id", Value::from(id.as_i64()))])
            .await?;

        if removed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
