//! Staff roles and permission levels.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Role`] from stored text.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// Staff role with different permission levels.
///
/// Stored as its display text in the `users` table and cached in the
/// session at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access to every area including user management.
    Admin,
    /// Catalog and cart management.
    Pharmacist,
    /// Order checkout and sales history.
    Cashier,
}

impl Role {
    /// Every role, in form-choice order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Pharmacist, Self::Cashier];

    /// The role's display/storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Pharmacist => "Pharmacist",
            Self::Cashier => "Cashier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Pharmacist" => Ok(Self::Pharmacist),
            "Cashier" => Ok(Self::Cashier),
            other => Err(RoleError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_reject_unknown() {
        assert!("Janitor".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }
}
