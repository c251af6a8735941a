//! Numeric helpers for attribute values.
//!
//! Values are `f64`. Rounding and the textual form used by save records
//! live here so every module agrees on them.

use crate::error::AttributeError;

/// Type alias for attribute values.
pub type AttributeValue = f64;

/// Lower limit used when an attribute has no minimum bound.
pub const NO_MIN: AttributeValue = f64::MIN;

/// Upper limit used when an attribute has no maximum bound.
pub const NO_MAX: AttributeValue = f64::MAX;

/// Round to the nearest integer, ties to even.
///
/// # Examples
///
/// ```rust
/// use attrkit::numeric::round_to_int;
///
/// assert_eq!(round_to_int(1.4), 1);
/// assert_eq!(round_to_int(2.5), 2);
/// assert_eq!(round_to_int(3.5), 4);
/// assert_eq!(round_to_int(-1.6), -2);
/// ```
pub fn round_to_int(value: AttributeValue) -> i64 {
    // `as` saturates, so the unbounded limits map to i64::MIN / i64::MAX.
    value.round_ties_even() as i64
}

/// Format a value as locale-invariant decimal text.
///
/// The output is the shortest text that parses back to the same value.
pub fn format_value(value: AttributeValue) -> String {
    value.to_string()
}

/// Parse locale-invariant decimal text.
///
/// # Examples
///
/// ```rust
/// use attrkit::numeric::parse_value;
///
/// assert_eq!(parse_value("12.5").unwrap(), 12.5);
/// assert!(parse_value("12,5").is_err());
/// ```
pub fn parse_value(text: &str) -> Result<AttributeValue, AttributeError> {
    text.trim()
        .parse::<AttributeValue>()
        .map_err(|e| AttributeError::InvalidNumber {
            text: text.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_ties_even() {
        assert_eq!(round_to_int(0.5), 0);
        assert_eq!(round_to_int(1.5), 2);
        assert_eq!(round_to_int(-2.5), -2);
        assert_eq!(round_to_int(99.6), 100);
    }

    #[test]
    fn test_round_saturates() {
        assert_eq!(round_to_int(NO_MAX), i64::MAX);
        assert_eq!(round_to_int(NO_MIN), i64::MIN);
    }

    #[test]
    fn test_format_parse() {
        for v in [0.0, -3.25, 100.0, 0.1, 1e-7, NO_MAX, NO_MIN] {
            assert_eq!(parse_value(&format_value(v)).unwrap(), v);
        }
        assert_eq!(format_value(100.0), "100");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_value("abc").unwrap_err();
        assert!(matches!(err, AttributeError::InvalidNumber { ref text, .. } if text == "abc"));
    }
}
