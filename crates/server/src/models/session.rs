//! Session-related types for authentication state.

use serde::{Deserialize, Serialize};

use apotheca_core::{Email, Role, UserId};

/// Session-stored staff identity.
///
/// Cached in the session at login and read back by every view; there is
/// no per-request re-fetch from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub name: String,
    /// User's permission level.
    pub role: Role,
}

/// Session keys for authentication and cart data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session-owned shopping cart.
    pub const CART: &str = "cart";
}
