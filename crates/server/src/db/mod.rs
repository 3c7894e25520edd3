//! Database access for the pharmacy store.
//!
//! # Tables
//!
//! - `products` - catalog and stock counters
//! - `customers` - checkout customer records
//! - `sales` - one row per completed checkout
//! - `users` - staff accounts and roles
//! - `user_info` - optional 1:1 staff profile extension
//! - `sessions` - tower-sessions storage (managed by the session layer)
//!
//! All application access to the five logical tables goes through the
//! four operations on [`store::Store`]; the typed repositories in this
//! module are its only consumers.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p apotheca-cli -- migrate
//! ```

pub mod customers;
pub mod products;
pub mod sales;
pub mod store;
pub mod user_info;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use products::ProductRepository;
pub use sales::SaleRepository;
pub use store::{Store, Value};
pub use user_info::UserInfoRepository;
pub use users::UserRepository;

/// Embedded migrations for the pharmacy database.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during store and repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed call shape: mismatched column/value lengths, empty
    /// sequences, or an invalid identifier.
    #[error("shape error: {0}")]
    Shape(String),

    /// A mutation that would touch the whole table (empty filter map).
    #[error("unsafe operation: {0}")]
    UnsafeOperation(String),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Parse a value stored as text back into its domain type.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` naming the column when the stored
/// text no longer parses.
pub(crate) fn parse_stored<T>(raw: &str, column: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| {
        StoreError::DataCorruption(format!("invalid {column} in database: {e}"))
    })
}
