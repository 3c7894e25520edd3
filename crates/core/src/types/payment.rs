//! Customer payment methods.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`PaymentMethod`] from stored text.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid payment method: {0}")]
pub struct PaymentMethodError(pub String);

/// How a customer settles an order.
///
/// Stored in snake_case in the `customers` table; that is also the
/// wire format the checkout form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Insurance,
    Cash,
    MobileMoney,
    BankTransfer,
}

impl PaymentMethod {
    /// Every method, in form-choice order.
    pub const ALL: [Self; 4] = [
        Self::Insurance,
        Self::Cash,
        Self::MobileMoney,
        Self::BankTransfer,
    ];

    /// The method's storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insurance => "insurance",
            Self::Cash => "cash",
            Self::MobileMoney => "mobile_money",
            Self::BankTransfer => "bank_transfer",
        }
    }

    /// Human-readable label for forms and invoices.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Insurance => "Insurance",
            Self::Cash => "Cash",
            Self::MobileMoney => "Mobile Money",
            Self::BankTransfer => "Bank Transfer",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| PaymentMethodError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for method in PaymentMethod::ALL {
            assert_eq!(
                method.as_str().parse::<PaymentMethod>().unwrap(),
                method
            );
        }
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::MobileMoney).unwrap();
        assert_eq!(json, "\"mobile_money\"");
    }

    #[test]
    fn test_reject_unknown() {
        assert!("barter".parse::<PaymentMethod>().is_err());
    }
}
