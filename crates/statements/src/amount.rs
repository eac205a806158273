use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult};

/// Positive monetary amount with exactly two fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Number of fractional digits carried by every amount.
    pub const SCALE: u32 = 2;

    /// Largest accepted amount; matches the `NUMERIC(14, 2)` column.
    pub const MAX: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

    /// Validate and normalise a decimal into an amount.
    ///
    /// Rejects zero, negative values, values above [`Amount::MAX`] and values
    /// with more than two significant fractional digits (`1.005` is not
    /// silently rounded).
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be positive"));
        }
        if value > Self::MAX {
            return Err(DomainError::validation(
                "amount must not exceed 999999999999.99",
            ));
        }

        let mut normalized = value.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(DomainError::validation(
                "amount supports at most two fractional digits",
            ));
        }
        normalized.rescale(Self::SCALE);

        Ok(Self(normalized))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Free-text annotation attached to a movement. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(text: impl Into<String>) -> DomainResult<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("description must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Description {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

impl core::fmt::Display for Description {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pads_to_two_fractional_digits() {
        let amount = Amount::new(dec!(510)).unwrap();
        assert_eq!(amount.to_string(), "510.00");
        assert_eq!(amount.value(), dec!(510));
    }

    #[test]
    fn trailing_zeros_beyond_scale_are_accepted() {
        let amount = Amount::new(dec!(12.5000)).unwrap();
        assert_eq!(amount.to_string(), "12.50");
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(Amount::new(Decimal::ZERO).is_err());
        assert!(Amount::new(dec!(-1)).is_err());
    }

    #[test]
    fn sub_cent_precision_is_rejected() {
        let err = Amount::new(dec!(1.005)).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("amount supports at most two fractional digits")
        );
    }

    #[test]
    fn upper_bound_matches_storage_precision() {
        assert_eq!(Amount::MAX, dec!(999999999999.99));
        assert_eq!(Amount::new(Amount::MAX).unwrap().to_string(), "999999999999.99");

        let err = Amount::new(dec!(1000000000000)).unwrap_err();
        assert_eq!(err, DomainError::validation("amount must not exceed 999999999999.99"));
        assert!(Amount::new(dec!(50000000000000000000000000000)).is_err());
    }

    #[test]
    fn deserializes_from_json_number() {
        let amount: Amount = serde_json::from_str("400").unwrap();
        assert_eq!(amount.value(), dec!(400));
        assert!(serde_json::from_str::<Amount>("0").is_err());
    }

    #[test]
    fn blank_description_is_rejected() {
        assert!(Description::new("   ").is_err());
        assert_eq!(Description::new("  Salario ").unwrap().as_str(), "Salario");
    }
}
