//! Polars `AnyValue` conversions for feature tables.
//!
//! The fitted pipeline reads each cell either as a categorical level or as a
//! number. These helpers define both readings so that an integer column such
//! as `Generation` encodes to the same level (`"12"`) whether the table was
//! built from a record or loaded from a CSV file.

use polars::prelude::AnyValue;

/// Reads a cell as a categorical level.
///
/// Returns `None` for `Null` and for blank strings. Floats are formatted
/// without trailing zeros, so `15.60` and `15.6` name the same level.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use lps_common::cell_to_category;
///
/// assert_eq!(cell_to_category(AnyValue::Null), None);
/// assert_eq!(cell_to_category(AnyValue::Int64(12)), Some("12".to_string()));
/// assert_eq!(cell_to_category(AnyValue::String("ASUS")), Some("ASUS".to_string()));
/// ```
pub fn cell_to_category(value: AnyValue<'_>) -> Option<String> {
    let level = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            // Display wraps some string-like values in quotes
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    };
    if level.trim().is_empty() {
        None
    } else {
        Some(level)
    }
}

/// Reads a cell as a number, coercing numeric strings.
///
/// Returns `None` for `Null`, for strings that do not parse and for any other
/// type. Callers treat `None` as a type coercion failure.
pub fn cell_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Formats a floating-point number without trailing zeros after the decimal point.
///
/// # Examples
///
/// ```
/// use lps_common::format_numeric;
///
/// assert_eq!(format_numeric(15.6), "15.6");
/// assert_eq!(format_numeric(14.0), "14");
/// assert_eq!(format_numeric(100.0), "100");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() || trimmed == "-" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Formats a rupiah amount rounded to whole rupiah with comma-grouped thousands.
///
/// Non-finite values are rendered with their `Display` form.
///
/// # Examples
///
/// ```
/// use lps_common::format_rupiah;
///
/// assert_eq!(format_rupiah(30_911_770.07), "Rp 30,911,770");
/// assert_eq!(format_rupiah(999.6), "Rp 1,000");
/// ```
pub fn format_rupiah(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let whole = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && whole != "0" { "-" } else { "" };
    format!("Rp {sign}{grouped}")
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
