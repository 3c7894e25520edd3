//! Staff profile (`user_info`) repository.
//!
//! Each staff account carries at most one profile; the create path
//! pre-checks for an existing row.

use chrono::NaiveDate;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use apotheca_core::{Email, ProfileId, UserId};

use super::store::{Store, Value};
use super::StoreError;
use crate::models::{NewProfile, UserProfile};

/// Internal row type for profile queries.
#[derive(Debug, FromRow)]
struct ProfileRow {
    info_id: i64,
    user_id: i64,
    first_name: String,
    last_name: String,
    middle_name: String,
    dob: NaiveDate,
    email_address: String,
    gender: String,
    home_address: String,
    marital_status: String,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email_address).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email_address in database: {e}"))
        })?;

        Ok(Self {
            id: ProfileId::new(row.info_id),
            user_id: UserId::new(row.user_id),
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name,
            date_of_birth: row.dob,
            email,
            gender: row.gender,
            home_address: row.home_address,
            marital_status: row.marital_status,
        })
    }
}

fn map_row(row: &SqliteRow) -> Result<UserProfile, StoreError> {
    ProfileRow::from_row(row)
        .map_err(StoreError::Database)?
        .try_into()
}

/// Repository for staff profile database operations.
pub struct UserInfoRepository<'a> {
    store: &'a Store,
}

impl<'a> UserInfoRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Get the profile attached to a staff account, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let rows = self
            .store
            .read(
                "user_info",
                Some(&[("user_id", Value::from(user_id.as_i64()))]),
                None,
                false,
            )
            .await?;
        rows.first().map(map_row).transpose()
    }

    /// Attach a profile to a staff account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the account already has a
    /// profile, `StoreError::Database` for other failures.
    pub async fn create(
        &self,
        user_id: UserId,
        profile: &NewProfile,
    ) -> Result<ProfileId, StoreError> {
        if self.get_by_user(user_id).await?.is_some() {
            return Err(StoreError::Conflict("profile already exists".to_owned()));
        }

        let id = self
            .store
            .insert(
                "user_info",
                &[
                    "user_id",
                    "first_name",
                    "last_name",
                    "middle_name",
                    "dob",
                    "email_address",
                    "gender",
                    "home_address",
                    "marital_status",
                ],
                &[
                    Value::from(user_id.as_i64()),
                    Value::from(profile.first_name.clone()),
                    Value::from(profile.last_name.clone()),
                    Value::from(profile.middle_name.clone()),
                    Value::from(profile.date_of_birth),
                    Value::from(profile.email.as_str()),
                    Value::from(profile.gender.clone()),
                    Value::from(profile.home_address.clone()),
                    Value::from(profile.marital_status.clone()),
                ],
            )
            .await?;
        Ok(ProfileId::new(id))
    }

    /// Rewrite the profile attached to a staff account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account has no profile.
    pub async fn update(&self, user_id: UserId, profile: &NewProfile) -> Result<(), StoreError> {
        let changed = self
            .store
            .update(
                "user_info",
                &[
                    ("first_name", Value::from(profile.first_name.clone())),
                    ("last_name", Value::from(profile.last_name.clone())),
                    ("middle_name", Value::from(profile.middle_name.clone())),
                    ("dob", Value::from(profile.date_of_birth)),
                    ("email_address", Value::from(profile.email.as_str())),
                    ("gender", Value::from(profile.gender.clone())),
                    ("home_address", Value::from(profile.home_address.clone())),
                    ("marital_status", Value::from(profile.marital_status.clone())),
                ],
                &[("user_id", Value::from(user_id.as_i64()))],
            )
            .await?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
