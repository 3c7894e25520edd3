//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod users;

use secrecy::SecretString;
use sqlx::SqlitePool;

use apotheca_server::db;

/// Connect to the configured database.
///
/// Reads `APOTHECA_DATABASE_URL` (falling back to `DATABASE_URL`) after
/// loading `.env` if present.
pub(crate) async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("APOTHECA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "APOTHECA_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    Ok(pool)
}
