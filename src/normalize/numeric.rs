// src/normalize/numeric.rs

use serde_json::Value;

/// Parse a raw cell into a finite number.
///
/// Numbers pass through; strings are read with pt-BR separators (see
/// [`parse_number_str`]). Null, booleans, arrays and objects yield `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number_str(s),
        _ => None,
    }
}

/// Parse a pt-BR formatted numeric string.
///
/// Everything except digits, `,`, `.` and `-` is dropped first, so currency
/// symbols, percent signs and spaces are ignored. Then:
/// - comma and dot both present: dot is the thousands separator, comma the decimal;
/// - only comma: comma is the decimal separator;
/// - only dot: left as-is.
pub fn parse_number_str(raw: &str) -> Option<f64> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let has_comma = kept.contains(',');
    let has_dot = kept.contains('.');
    let canonical = match (has_comma, has_dot) {
        (true, true) => kept.replace('.', "").replace(',', "."),
        (true, false) => kept.replace(',', "."),
        _ => kept,
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ratio-or-percent policy: magnitudes up to 1 are ratios and get scaled to
/// percentage points, anything larger is already a percentage.
///
/// Misreads a true 1% recorded as `1` (becomes 100) and cannot tell 100% as
/// `1.0` from 1% as `1.0`. Every percent-like field goes through here so the
/// policy lives in one place.
pub fn normalize_percent(value: f64) -> f64 {
    if value.abs() <= 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// True when a cell reads as a number: a JSON number, or a string made only
/// of digits, separators, sign, currency and percent marks.
pub fn looks_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let stripped = s.trim().replace("R$", "");
            let mut digits = 0usize;
            for c in stripped.chars() {
                if c.is_ascii_digit() {
                    digits += 1;
                } else if !matches!(c, ',' | '.' | '-' | '+' | '%' | ' ' | '\u{a0}') {
                    return false;
                }
            }
            digits > 0
        }
        _ => false,
    }
}

/// Display text for a cell: trimmed non-empty strings, numbers in their JSON
/// form, booleans spelled out. Null and empty strings yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_brazilian_thousands_and_decimal() {
        assert_eq!(parse_number(&json!("1.234,56")), Some(1234.56));
        assert_eq!(parse_number(&json!("R$ 12.345.678,90")), Some(12345678.90));
        assert_eq!(parse_number(&json!("-1.000,5")), Some(-1000.5));
    }

    #[test]
    fn test_single_separator() {
        assert_eq!(parse_number(&json!("1234.56")), Some(1234.56));
        assert_eq!(parse_number(&json!("12,5%")), Some(12.5));
        // dot alone is a decimal point, even when it looks like thousands
        assert_eq!(parse_number(&json!("1.234")), Some(1.234));
    }

    #[test]
    fn test_only_commas_with_several_groups_is_rejected() {
        assert_eq!(parse_number_str("1,234,567"), None);
    }

    #[test]
    fn test_empty_and_null() {
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("   ")), None);
        assert_eq!(parse_number(&json!("R$")), None);
        assert_eq!(parse_number(&json!("-")), None);
        assert_eq!(parse_number(&Value::Null), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!([1, 2])), None);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_number(&json!(42)), Some(42.0));
        assert_eq!(parse_number(&json!(-0.25)), Some(-0.25));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_number_str("12-3"), None);
        assert_eq!(parse_number_str("abc"), None);
    }

    #[test]
    fn test_normalize_percent_boundaries() {
        assert_eq!(normalize_percent(0.5), 50.0);
        assert_eq!(normalize_percent(-0.2), -20.0);
        assert_eq!(normalize_percent(1.0), 100.0);
        assert_eq!(normalize_percent(1.5), 1.5);
        assert_eq!(normalize_percent(100.0), 100.0);
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric(&json!(3)));
        assert!(looks_numeric(&json!("R$ 1.234,00")));
        assert!(looks_numeric(&json!("95%")));
        assert!(!looks_numeric(&json!("Semana 12")));
        assert!(!looks_numeric(&json!("Jan/24")));
        assert!(!looks_numeric(&json!("")));
        assert!(!looks_numeric(&Value::Null));
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("  Loja 1 ")), Some("Loja 1".to_string()));
        assert_eq!(value_text(&json!(2024)), Some("2024".to_string()));
        assert_eq!(value_text(&json!("")), None);
        assert_eq!(value_text(&Value::Null), None);
    }
}
