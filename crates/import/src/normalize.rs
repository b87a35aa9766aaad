use std::str::FromStr;

use tally_core::{Money, MoneyParseError};

/// Header cells are compared trimmed and lower-cased, so `" Amount "` and
/// `"amount"` name the same column.
pub fn normalize_header(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Parses a locale-formatted amount: thousands separators, a `$` sign and
/// inner spaces are stripped, accounting parentheses mean negative, and the
/// decimal separator is mapped to `.`.
pub fn parse_amount(
    s: &str,
    thousands_separator: &str,
    decimal_separator: &str,
) -> Result<Money, MoneyParseError> {
    let raw = s.trim();
    let (negative, body) = if raw.len() >= 2 && raw.starts_with('(') && raw.ends_with(')') {
        (true, &raw[1..raw.len() - 1])
    } else {
        (false, raw)
    };

    let mut cleaned = body.replace(['$', ' ', '\u{a0}'], "");
    if !thousands_separator.is_empty() {
        cleaned = cleaned.replace(thousands_separator, "");
    }
    if !decimal_separator.is_empty() && decimal_separator != "." {
        cleaned = cleaned.replace(decimal_separator, ".");
    }
    if cleaned.is_empty() {
        return Err(MoneyParseError(s.to_string()));
    }

    let amount = Money::from_str(&cleaned).map_err(|_| MoneyParseError(s.to_string()))?;
    Ok(if negative { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn us(s: &str) -> Money {
        parse_amount(s, ",", ".").unwrap()
    }

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("  Amount "), "amount");
        assert_eq!(normalize_header("DATE"), "date");
    }

    #[test]
    fn plain_amounts() {
        assert_eq!(us("123.45"), Money::from_cents(12345));
        assert_eq!(us("100"), Money::from(100));
        assert_eq!(us("0"), Money::zero());
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(us("1,234.56"), Money::from_cents(123456));
        assert_eq!(us("1,000,000"), Money::from(1_000_000));
    }

    #[test]
    fn negative_and_parentheses() {
        assert_eq!(us("-50.00"), Money::from(-50));
        assert_eq!(us("(75.25)"), Money::from_cents(-7525));
        assert_eq!(us("$99.99"), Money::from_cents(9999));
    }

    #[test]
    fn european_separators() {
        assert_eq!(parse_amount("1.234,56", ".", ",").unwrap(), Money::from_cents(123456));
        assert_eq!(parse_amount("1 234,5", "", ",").unwrap(), Money::from_cents(123450));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(parse_amount("", ",", ".").is_err());
        assert!(parse_amount("   ", ",", ".").is_err());
        assert!(parse_amount("n/a", ",", ".").is_err());
        assert!(parse_amount("()", ",", ".").is_err());
        assert!(parse_amount("NaN", ",", ".").is_err());
    }

    #[test]
    fn error_keeps_original_text() {
        let err = parse_amount(" abc ", ",", ".").unwrap_err();
        assert_eq!(err.0, " abc ");
    }
}
