//! Database migration command.
//!
//! ```bash
//! apotheca-cli migrate
//! ```

use apotheca_server::db;

/// Run the embedded migrations against the configured database.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
