//! Coercion of raw form input into numbers.
//!
//! Numeric fields never hold anything but a finite, non-negative number:
//! whatever cannot be read as one becomes zero.

/// Parse a monetary amount or quantity.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(sanitize_amount).unwrap_or(0.0)
}

/// Parse a head count or day count. Fractions are truncated toward zero.
pub fn parse_count(raw: &str) -> u32 {
    let value = parse_amount(raw).trunc();
    if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

/// Clamp an already-numeric value into the allowed range.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parses_plain_decimals() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount("  7 "), 7.0);
        assert_eq!(parse_amount("0.01"), 0.01);
    }

    #[test]
    fn amount_garbage_is_zero() {
        for raw in ["abc", "", "   ", "1,5", "NaN", "inf", "-infinity", "12abc"] {
            assert_eq!(parse_amount(raw), 0.0, "input {raw:?}");
        }
    }

    #[test]
    fn amount_negative_is_zero() {
        assert_eq!(parse_amount("-3"), 0.0);
        assert_eq!(sanitize_amount(-0.5), 0.0);
    }

    #[test]
    fn count_truncates_fractions() {
        assert_eq!(parse_count("2.7"), 2);
        assert_eq!(parse_count("10"), 10);
    }

    #[test]
    fn count_garbage_is_zero() {
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-4"), 0);
    }

    #[test]
    fn count_saturates() {
        assert_eq!(parse_count("1e20"), u32::MAX);
    }
}
