//! Staff account management commands.

use apotheca_core::Role;
use apotheca_server::db::Store;
use apotheca_server::services::auth::AuthService;

/// Create a staff account from the command line.
///
/// The usual path for bootstrapping the first Admin before anyone can
/// log in to use the settings pages.
///
/// # Errors
///
/// Returns an error if the role is unknown, the input fails validation,
/// or the email is already registered.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
    contact: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role: Role = role
        .parse()
        .map_err(|_| format!("invalid role {role:?}; expected Admin, Pharmacist, or Cashier"))?;

    let pool = super::connect().await?;
    let store = Store::new(pool);
    let auth = AuthService::new(&store);

    let user = auth.register(name, email, password, role, contact).await?;

    tracing::info!(user = %user.email, role = %user.role, "Staff account created");
    Ok(())
}
