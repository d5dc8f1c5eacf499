//! # Numeric Coercion
//!
//! Form fields hold text. Numbers that do not parse fall back to a default
//! instead of blocking the form, so `"abc"` in a price box saves as `0`.
//!
//! Every numeric form field goes through [`parse_numeric_or_default`]; the
//! typed wrappers only pick the target unit.

use crate::money::Money;

/// Parses `raw` as a float, returning `default` for empty, non-numeric or
/// non-finite input.
///
/// ## Example
/// ```rust
/// use deli_core::coerce::parse_numeric_or_default;
///
/// assert_eq!(parse_numeric_or_default("12.5", 0.0), 12.5);
/// assert_eq!(parse_numeric_or_default(" 3 ", 0.0), 3.0);
/// assert_eq!(parse_numeric_or_default("abc", 0.0), 0.0);
/// assert_eq!(parse_numeric_or_default("", 1.0), 1.0);
/// ```
pub fn parse_numeric_or_default(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

/// Money field: exact decimal parse first, float parse as fallback, zero
/// otherwise.
pub fn parse_money_or_zero(raw: &str) -> Money {
    Money::from_decimal_str(raw)
        .or_else(|| Money::from_f64(parse_numeric_or_default(raw, 0.0)))
        .unwrap_or_default()
}

/// Count field: whole units, fractional input truncated toward zero.
pub fn parse_count_or_zero(raw: &str) -> i64 {
    if let Ok(count) = raw.trim().parse::<i64>() {
        return count;
    }
    parse_numeric_or_default(raw, 0.0).trunc() as i64
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_coercion() {
        assert_eq!(parse_money_or_zero("10.50").cents(), 1050);
        assert_eq!(parse_money_or_zero("1e2").cents(), 10000);
        assert_eq!(parse_money_or_zero("S/ 10").cents(), 0);
        assert_eq!(parse_money_or_zero("").cents(), 0);
        assert_eq!(parse_money_or_zero("-4").cents(), -400);
    }

    #[test]
    fn test_count_coercion() {
        assert_eq!(parse_count_or_zero("12"), 12);
        assert_eq!(parse_count_or_zero("2.9"), 2);
        assert_eq!(parse_count_or_zero("doce"), 0);
        assert_eq!(parse_count_or_zero("  "), 0);
    }

    #[test]
    fn test_non_finite_falls_back() {
        assert_eq!(parse_numeric_or_default("NaN", 5.0), 5.0);
        assert_eq!(parse_numeric_or_default("inf", 5.0), 5.0);
    }
}
