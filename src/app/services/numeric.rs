//! Tolerant numeric parsing for scraped and hand-edited cells
//!
//! Prices and areas arrive with unit markers, thousands separators (regular
//! and non-breaking spaces), and decimal commas. Parsing yields an explicit
//! `Option<f64>`: an unparsable cell is "no data" and contributes nothing to
//! any aggregate. It is never coerced to zero.

use crate::constants::UNIT_SUFFIXES;

/// Parse a decimal number from a raw cell.
///
/// Accepts e.g. `"101,62 m²"`, `"52 m2"`, `"11 999 zł/m²"`, `"123900,90"`.
/// Returns `None` for empty cells, the missing marker, or anything that does
/// not survive cleanup as a valid number.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let mut s = raw.to_string();

    for unit in UNIT_SUFFIXES {
        s = s.replace(unit, "");
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Report cells may pack auxiliary data after a semicolon (plot numbers,
/// precinct lists). Matching uses only the part before the first `;`.
pub fn trim_after_semicolon(raw: &str) -> &str {
    match raw.split_once(';') {
        Some((head, _)) => head.trim(),
        None => raw.trim(),
    }
}

/// Round to two decimal places for persisted monetary values
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a number the way the tables store it: no trailing `.0` on whole
/// values, a decimal point otherwise
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_with_units_and_spaces() {
        assert_eq!(parse_decimal("11 999 zł/m²"), Some(11999.0));
        assert_eq!(parse_decimal("52 m2"), Some(52.0));
        assert_eq!(parse_decimal("101,62 m²"), Some(101.62));
        assert_eq!(parse_decimal("1\u{a0}234\u{a0}567 zł"), Some(1234567.0));
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_decimal("123900,90"), Some(123900.90));
        assert_eq!(parse_decimal("15,5"), Some(15.5));
    }

    #[test]
    fn test_unparsable_is_none_not_zero() {
        assert_eq!(parse_decimal("---"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("brak danych"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
        assert_eq!(parse_decimal("zł"), None);
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(parse_decimal("-5"), Some(-5.0));
        assert_eq!(parse_decimal("0"), Some(0.0));
    }

    #[test]
    fn test_trim_after_semicolon() {
        assert_eq!(trim_after_semicolon("52,5; działka 17/2"), "52,5");
        assert_eq!(trim_after_semicolon("  74  "), "74");
        assert_eq!(trim_after_semicolon(""), "");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10574.996), 10575.0);
        assert_eq!(round2(10.456), 10.46);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10575.0), "10575");
        assert_eq!(format_number(8712.5), "8712.5");
        assert_eq!(format_number(0.0), "0");
    }
}
