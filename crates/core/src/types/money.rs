//! Decimal money amounts.

use core::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
///
/// Amounts use decimal arithmetic throughout; floats never touch money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., cedis, not pesewas).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create an amount in the default currency.
    #[must_use]
    pub const fn cedis(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::GHS)
    }

    /// The zero amount in the default currency.
    #[must_use]
    pub const fn zero() -> Self {
        Self::cedis(Decimal::ZERO)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Format for display (e.g., "GHS 19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency_code.code(), self.amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CurrencyCode {
    /// Ghanaian cedi - the shop's trading currency.
    #[default]
    GHS,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GHS => "GHS",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    /// The display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::GHS => "₵",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_times_quantity() {
        let unit = Money::cedis(dec("5.00"));
        assert_eq!(unit.times(2).amount, dec("10.00"));
        assert_eq!(unit.times(0).amount, Decimal::ZERO);
    }

    #[test]
    fn test_sum_including_empty() {
        let total: Money = std::iter::empty().sum();
        assert_eq!(total, Money::zero());

        let total: Money = [Money::cedis(dec("1.50")), Money::cedis(dec("2.25"))]
            .into_iter()
            .sum();
        assert_eq!(total.amount, dec("3.75"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::cedis(dec("19.99")).display(), "GHS 19.99");
        assert_eq!(Money::cedis(dec("5")).display(), "GHS 5.00");
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::GHS.code(), "GHS");
        assert_eq!(CurrencyCode::GHS.symbol(), "₵");
        assert_eq!(CurrencyCode::default(), CurrencyCode::GHS);
    }
}
