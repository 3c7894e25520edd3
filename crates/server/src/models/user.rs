//! Staff user domain types.

use chrono::NaiveDate;

use apotheca_core::{Email, Phone, ProfileId, Role, UserId};

/// A staff account (domain type).
///
/// The password hash never leaves the database layer; handlers only see
/// this struct.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email. Uniqueness is enforced by a pre-check read at
    /// creation time, not by a database constraint.
    pub email: Email,
    /// Permission level.
    pub role: Role,
    /// Contact phone number.
    pub contact: Phone,
}

/// Optional 1:1 personal profile for a staff account.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// Unique profile ID.
    pub id: ProfileId,
    /// The account this profile extends. At most one profile per user.
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub date_of_birth: NaiveDate,
    pub email: Email,
    pub gender: String,
    pub home_address: String,
    pub marital_status: String,
}

/// Field set for creating or updating a profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub date_of_birth: NaiveDate,
    pub email: Email,
    pub gender: String,
    pub home_address: String,
    pub marital_status: String,
}
