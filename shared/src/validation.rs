//! Validation utilities for incoming stock movements
//!
//! Every failure names the offending field so callers can report it back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::MovementKind;

/// A missing or malformed input field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, format!("Missing required field: {}", field))
    }
}

// ============================================================================
// Field Presence
// ============================================================================

/// Require a non-blank text field, returning it trimmed
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::missing(field)),
    }
}

/// Require a numeric field
pub fn require_decimal(field: &str, value: Option<Decimal>) -> Result<Decimal, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

// ============================================================================
// Numeric Ranges
// ============================================================================

/// Quantities moved must be strictly positive
pub fn validate_positive(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::new(field, format!("{} must be positive", field)));
    }
    Ok(())
}

/// Prices may be zero (giveaways) but never negative
pub fn validate_non_negative(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(
            field,
            format!("{} cannot be negative", field),
        ));
    }
    Ok(())
}

/// Total price of a movement, rejecting products outside the decimal range
pub fn checked_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, ValidationError> {
    quantity.checked_mul(unit_price).ok_or_else(|| {
        ValidationError::new("quantity", "quantity * unitPrice is out of range")
    })
}

/// Result-size limits must be positive when given
pub fn validate_limit(limit: Option<i64>) -> Result<Option<i64>, ValidationError> {
    match limit {
        Some(n) if n <= 0 => Err(ValidationError::new("limit", "limit must be positive")),
        other => Ok(other),
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new(field, format!("{} must be a date in YYYY-MM-DD form", field))
    })
}

/// Parse a movement type (`IN` or `OUT`)
pub fn parse_kind(field: &str, value: &str) -> Result<MovementKind, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, format!("{} must be IN or OUT", field)))
}

/// Require that an optional type field, when present, matches the endpoint's kind
pub fn expect_kind(
    field: &str,
    value: Option<&str>,
    expected: MovementKind,
) -> Result<(), ValidationError> {
    match value {
        None => Ok(()),
        Some(raw) => {
            let kind = parse_kind(field, raw)?;
            if kind != expected {
                return Err(ValidationError::new(
                    field,
                    format!("{} must be {}", field, expected),
                ));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("fishType", Some(" Pomfret ")).unwrap(), "Pomfret");
        let err = require_text("fishType", Some("   ")).unwrap_err();
        assert_eq!(err.field, "fishType");
        assert_eq!(err.message, "Missing required field: fishType");
        assert!(require_text("supplierName", None).is_err());
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(validate_positive("quantity", Decimal::ONE).is_ok());
        assert!(validate_positive("quantity", Decimal::ZERO).is_err());
        assert!(validate_non_negative("unitPrice", Decimal::ZERO).is_ok());
        assert!(validate_non_negative("unitPrice", Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_checked_total() {
        assert_eq!(
            checked_total(Decimal::from(30), Decimal::from(12)).unwrap(),
            Decimal::from(360)
        );
        let huge = Decimal::from_str_exact("100000000000000000000").unwrap();
        let err = checked_total(huge, huge).unwrap_err();
        assert_eq!(err.field, "quantity");
        assert_eq!(err.message, "quantity * unitPrice is out of range");
    }

    #[test]
    fn test_limit() {
        assert_eq!(validate_limit(None).unwrap(), None);
        assert_eq!(validate_limit(Some(10)).unwrap(), Some(10));
        assert!(validate_limit(Some(0)).is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("date", "2024-03-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(parse_date("date", "01/03/2024").is_err());
        assert!(parse_date("date", "2024-02-30").is_err());
    }

    #[test]
    fn test_expect_kind() {
        assert!(expect_kind("type", None, MovementKind::Sale).is_ok());
        assert!(expect_kind("type", Some("OUT"), MovementKind::Sale).is_ok());
        let err = expect_kind("type", Some("IN"), MovementKind::Sale).unwrap_err();
        assert_eq!(err.message, "type must be OUT");
        assert!(expect_kind("type", Some("SIDEWAYS"), MovementKind::Purchase).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_positive_quantities_accepted(n in 1i64..=1_000_000i64, scale in 0u32..4) {
            prop_assert!(validate_positive("quantity", Decimal::new(n, scale)).is_ok());
        }

        #[test]
        fn prop_non_positive_quantities_rejected(n in 0i64..=1_000_000i64) {
            prop_assert!(validate_positive("quantity", -Decimal::from(n)).is_err());
        }
    }
}
