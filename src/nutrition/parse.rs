//! Lenient numeric parsing for live-edited form fields
//!
//! Text typed into a numeric field is coerced, never rejected: the longest
//! leading numeric prefix wins and anything unparseable becomes zero.

/// Parse a decimal number, falling back to 0
///
/// Examples:
/// - "150" -> 150.0
/// - " 12.5g" -> 12.5
/// - ".5" -> 0.5
/// - "1e2" -> 100.0
/// - "abc" -> 0.0
/// - "" -> 0.0
pub fn parse_or_zero(raw: &str) -> f64 {
    let prefix = decimal_prefix(raw.trim_start());
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse an integer, truncating any fractional part, falling back to 0
///
/// Examples:
/// - "450" -> 450
/// - "12.7" -> 12
/// - "-3kg" -> -3
/// - "kcal" -> 0
pub fn parse_int_or_zero(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    trimmed[..end].parse::<i64>().unwrap_or(0)
}

/// Longest prefix of `s` that reads as a decimal literal
fn decimal_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    // Exponent only counts if at least one digit follows
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_or_zero("150"), 150.0);
        assert_eq!(parse_or_zero("12.5"), 12.5);
        assert_eq!(parse_or_zero(".5"), 0.5);
        assert_eq!(parse_or_zero("7."), 7.0);
        assert_eq!(parse_or_zero("-4"), -4.0);
    }

    #[test]
    fn test_parse_leading_prefix() {
        assert_eq!(parse_or_zero("  200g"), 200.0);
        assert_eq!(parse_or_zero("1.5.2"), 1.5);
        assert_eq!(parse_or_zero("1e2"), 100.0);
        assert_eq!(parse_or_zero("3e"), 3.0);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_or_zero("abc"), 0.0);
        assert_eq!(parse_or_zero(""), 0.0);
        assert_eq!(parse_or_zero("."), 0.0);
        assert_eq!(parse_or_zero("-"), 0.0);
        assert_eq!(parse_or_zero("NaN"), 0.0);
        assert_eq!(parse_or_zero("1e999"), 0.0);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int_or_zero("450"), 450);
        assert_eq!(parse_int_or_zero("12.7"), 12);
        assert_eq!(parse_int_or_zero(" -3kg"), -3);
        assert_eq!(parse_int_or_zero("kcal"), 0);
        assert_eq!(parse_int_or_zero(""), 0);
    }
}
