//! Human-readable number formatting for legend labels.

/// Placeholder shown for values that cannot be formatted.
pub const MISSING: &str = "\u{2014}";

/// Formats a number with thousands separators and at most two fraction
/// digits (`1234.5` -> `"1,234.5"`). Negative values keep their sign even
/// when they round to zero (`-0.004` -> `"-0"`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    let rounded = (value * 100.0).round() / 100.0;
    let negative = value.is_sign_negative();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Formats a legend range as `from–to`.
#[must_use]
pub fn format_range(from: f64, to: f64) -> String {
    if !from.is_finite() || !to.is_finite() {
        return MISSING.to_string();
    }
    format!("{}\u{2013}{}", format_number(from), format_number(to))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
