//! Numeric parsing and formatting shared by numeric rules.

/// Parse a cell as a finite number. Surrounding whitespace is ignored.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric value of a cell, with non-numeric cells counted as zero.
pub fn coerce_number(value: &str) -> f64 {
    parse_number(value).unwrap_or(0.0)
}

/// Integer value of a cell, if it holds a whole number.
pub fn parse_integer(value: &str) -> Option<i64> {
    let number = parse_number(value)?;
    if number.fract() != 0.0 || number.abs() > i64::MAX as f64 {
        return None;
    }
    Some(number as i64)
}

/// Render a number without float noise: `10.5`, `6`, `0.3`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = if value.abs() < 1e15 {
        (value * 1e10).round() / 1e10
    } else {
        value
    };
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.10}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}
