//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit (or leading +).
    #[error("phone number may only contain digits and an optional leading +")]
    InvalidCharacter,
    /// The digit count is outside the accepted range.
    #[error("phone number must have between {min} and {max} digits")]
    BadLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A contact phone number.
///
/// Accepts an optional leading `+` followed by 10 to 15 digits, the
/// format the customer and user forms require.
///
/// ## Examples
///
/// ```
/// use apotheca_core::Phone;
///
/// assert!(Phone::parse("+233201234567").is_ok());
/// assert!(Phone::parse("0241234567").is_ok());
/// assert!(Phone::parse("12345").is_err());       // too short
/// assert!(Phone::parse("024-123-4567").is_err()); // separators
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains anything other
    /// than digits after an optional leading `+`, or has a digit count
    /// outside 10..=15.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.strip_prefix('+').unwrap_or(s);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }

        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::BadLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("0241234567").is_ok());
        assert!(Phone::parse("+233201234567").is_ok());
        assert!(Phone::parse("123456789012345").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        // A bare plus has no digits at all.
        assert!(matches!(
            Phone::parse("+"),
            Err(PhoneError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_bad_characters() {
        assert!(matches!(
            Phone::parse("(024) 123-4567"),
            Err(PhoneError::InvalidCharacter)
        ));
        assert!(matches!(
            Phone::parse("02412345a7"),
            Err(PhoneError::InvalidCharacter)
        ));
        // Plus only allowed at the front.
        assert!(matches!(
            Phone::parse("0241+234567"),
            Err(PhoneError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_bad_length() {
        assert!(matches!(
            Phone::parse("123456789"),
            Err(PhoneError::BadLength { .. })
        ));
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::BadLength { .. })
        ));
    }

    #[test]
    fn test_display_preserves_input() {
        let phone = Phone::parse("+233201234567").unwrap();
        assert_eq!(phone.to_string(), "+233201234567");
    }
}
