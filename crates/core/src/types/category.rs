//! Product shelf categories.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Category`] from stored text.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid product category: {0}")]
pub struct CategoryError(pub String);

/// The shelf a product belongs to.
///
/// Stored as its display text in the `products` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Medication,
    HealthAndWellness,
    BabyCare,
    MedicalEquipment,
    HygieneProducts,
    DietaryNeeds,
}

impl Category {
    /// Every category, in form-choice order.
    pub const ALL: [Self; 6] = [
        Self::Medication,
        Self::HealthAndWellness,
        Self::BabyCare,
        Self::MedicalEquipment,
        Self::HygieneProducts,
        Self::DietaryNeeds,
    ];

    /// The category's display/storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medication => "Medication",
            Self::HealthAndWellness => "Health & Wellness",
            Self::BabyCare => "Baby Care",
            Self::MedicalEquipment => "Medical Equipment",
            Self::HygieneProducts => "Hygiene Products",
            Self::DietaryNeeds => "Dietary Needs",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_reject_unknown() {
        assert!("Groceries".parse::<Category>().is_err());
    }
}
