//! pt-BR number formatting: `.` groups thousands, `,` separates decimals.

/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "—";

/// Format with `decimals` fraction digits and pt-BR separators.
///
/// ```
/// use painel::present::format::format_decimal;
/// assert_eq!(format_decimal(1234.567, 2), "1.234,57");
/// ```
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, fraction) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };

    // group from the right every 3 digits
    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3);
    for (i, c) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match fraction {
        Some(frac) => format!("{sign}{grouped},{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `R$ 1.234,56`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let amount = format_decimal(value, 2);
    match amount.strip_prefix('-') {
        Some(abs) => format!("-R$ {abs}"),
        None => format!("R$ {amount}"),
    }
}

/// A ratio as a percentage: `0.1234` -> `12,34%`.
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    if !ratio.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}%", format_decimal(ratio * 100.0, decimals))
}

/// `1.234`
pub fn format_integer(value: f64) -> String {
    format_decimal(value, 0)
}

pub fn format_optional(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| PLACEHOLDER.to_string())
}
