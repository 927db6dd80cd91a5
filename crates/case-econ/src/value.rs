//! Reward value parsing and display formatting.
//!
//! Catalog values arrive as plain numbers, magnitude-suffixed strings
//! ("1.5B"), ranges ("8T-10T") or owner's-choice tags ("O/C[300T-390T]").
//! Text that cannot be read resolves to zero instead of failing, so bad
//! catalog data undercounts value rather than halting a simulation.

use case_core::RawValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

const OWNERS_CHOICE: &str = "O/C";
const RANGE_SEPARATOR: char = '-';

/// Magnitude suffixes and their power of ten. "QD" precedes "Q".
const SUFFIXES: [(&str, u32); 6] = [
    ("QD", 15),
    ("Q", 15),
    ("T", 12),
    ("B", 9),
    ("M", 6),
    ("K", 3),
];

/// Suffixes used when rendering, largest first.
const DISPLAY_SUFFIXES: [(&str, f64); 5] = [
    ("QD", 1e15),
    ("T", 1e12),
    ("B", 1e9),
    ("M", 1e6),
    ("K", 1e3),
];

/// Structured reading of a catalog value.
///
/// Ranges keep both bounds so callers that want the spread can have it;
/// `estimate` collapses to the conservative lower bound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum ParsedValue {
    Plain(f64),
    Range { low: f64, high: f64 },
    /// Value negotiated out-of-band with a stated plausible range.
    OwnersChoice { low: f64, high: f64 },
    /// No numeric reading, including owner's choice without a range.
    Unparseable,
}

impl ParsedValue {
    /// Point estimate: the value itself, the lower bound of a range, or 0.
    pub fn estimate(&self) -> f64 {
        match *self {
            ParsedValue::Plain(v) => v,
            ParsedValue::Range { low, .. } | ParsedValue::OwnersChoice { low, .. } => low,
            ParsedValue::Unparseable => 0.0,
        }
    }

    /// Upper bound where one was stated, otherwise the estimate.
    pub fn upper(&self) -> f64 {
        match *self {
            ParsedValue::Range { high, .. } | ParsedValue::OwnersChoice { high, .. } => high,
            other => other.estimate(),
        }
    }
}

/// Parse a raw catalog value. Non-finite numbers count as unparseable.
pub fn parse_value(raw: &RawValue) -> ParsedValue {
    match raw {
        RawValue::Number(v) if v.is_finite() => ParsedValue::Plain(*v),
        RawValue::Number(_) | RawValue::Missing => ParsedValue::Unparseable,
        RawValue::Text(s) => {
            let parsed = parse_text(s);
            if parsed == ParsedValue::Unparseable && !s.trim().is_empty() {
                debug!(value = %s, "unparseable value text counts as zero");
            }
            parsed
        }
    }
}

/// Point estimate of a raw catalog value.
///
/// Example:
/// assert_eq!(estimate(&RawValue::from("8T-10T")), 8e12);
pub fn estimate(raw: &RawValue) -> f64 {
    parse_value(raw).estimate()
}

/// Parse free text, e.g. "1.5k", "8T-10T", "o/c[300T-390T]".
pub fn parse_text(text: &str) -> ParsedValue {
    let s = text.trim().to_ascii_uppercase();
    if s.is_empty() {
        return ParsedValue::Unparseable;
    }
    if let Some(rest) = s.strip_prefix(OWNERS_CHOICE) {
        return match bracketed(rest).map(parse_text) {
            Some(ParsedValue::Plain(v)) => ParsedValue::OwnersChoice { low: v, high: v },
            Some(ParsedValue::Range { low, high })
            | Some(ParsedValue::OwnersChoice { low, high }) => {
                ParsedValue::OwnersChoice { low, high }
            }
            Some(ParsedValue::Unparseable) | None => ParsedValue::Unparseable,
        };
    }
    if s.contains(RANGE_SEPARATOR) {
        let mut parts = s.split(RANGE_SEPARATOR);
        let low = parts.next().and_then(parse_scalar);
        let high = parts.next().and_then(parse_scalar);
        return match (low, high) {
            (Some(low), Some(high)) => ParsedValue::Range { low, high },
            (Some(low), None) => ParsedValue::Range { low, high: low },
            (None, _) => ParsedValue::Unparseable,
        };
    }
    parse_scalar(&s).map_or(ParsedValue::Unparseable, ParsedValue::Plain)
}

fn bracketed(s: &str) -> Option<&str> {
    let open = s.find('[')?;
    let close = open + s[open..].find(']')?;
    Some(&s[open + 1..close])
}

/// A single number with an optional trailing magnitude suffix.
fn parse_scalar(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    for (suffix, exp) in SUFFIXES {
        if let Some(prefix) = cleaned.strip_suffix(suffix) {
            return scale(prefix.trim_end(), exp);
        }
    }
    leading_number(&cleaned).and_then(|n| n.parse::<f64>().ok())
}

/// Multiply in decimal so "1.1T" lands exactly on 1_100_000_000_000.
fn scale(prefix: &str, exp: u32) -> Option<f64> {
    let number = leading_number(prefix)?;
    let factor = Decimal::from_i128_with_scale(10i128.pow(exp), 0);
    Decimal::from_str(number)
        .ok()
        .and_then(|d| d.checked_mul(factor))
        .and_then(|d| d.normalize().to_f64())
        .or_else(|| {
            number
                .parse::<f64>()
                .ok()
                .map(|v| v * 10f64.powi(exp as i32))
        })
}

/// Longest prefix of `s` that reads as a float, like `parseFloat`.
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - end - 1;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'E' | b'e') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
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
    Some(&s[..end])
}

/// Render a base value with the largest fitting suffix, e.g. 1.5e12 -> "1.5T".
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let abs = v.abs();
    for (suffix, scale) in DISPLAY_SUFFIXES {
        if abs >= scale {
            return format!("{}{}", two_decimals(v / scale), suffix);
        }
    }
    two_decimals(v)
}

fn two_decimals(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> f64 {
        estimate(&RawValue::from(s))
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(estimate(&RawValue::Number(1234.0)), 1234.0);
        assert_eq!(estimate(&RawValue::Number(0.5)), 0.5);
        assert_eq!(estimate(&RawValue::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn suffixes_scale() {
        assert_eq!(text("1.5K"), 1_500.0);
        assert_eq!(text("2m"), 2_000_000.0);
        assert_eq!(text("3B"), 3e9);
        assert_eq!(text("1.1T"), 1_100_000_000_000.0);
        assert_eq!(text("4QD"), 4e15);
        assert_eq!(text("4Q"), 4e15);
        assert_eq!(text(" 12 "), 12.0);
        assert_eq!(text("1,000,000"), 1_000_000.0);
    }

    #[test]
    fn ranges_use_lower_bound() {
        assert_eq!(text("8T-10T"), text("8T"));
        assert_eq!(
            parse_text("8T-10T"),
            ParsedValue::Range {
                low: 8e12,
                high: 10e12
            }
        );
        assert_eq!(parse_text("5K-").upper(), 5_000.0);
    }

    #[test]
    fn owners_choice() {
        assert_eq!(text("O/C[300T-390T]"), text("300T"));
        assert_eq!(
            parse_text("o/c [300T-390T]"),
            ParsedValue::OwnersChoice {
                low: 300e12,
                high: 390e12
            }
        );
        assert_eq!(
            parse_text("O/C[5B]"),
            ParsedValue::OwnersChoice { low: 5e9, high: 5e9 }
        );
        assert_eq!(text("O/C"), 0.0);
        assert_eq!(parse_text("O/C"), ParsedValue::Unparseable);
        assert_eq!(text("O/C[]"), 0.0);
    }

    #[test]
    fn unparseable_is_zero() {
        assert_eq!(text(""), 0.0);
        assert_eq!(text("   "), 0.0);
        assert_eq!(text("priceless"), 0.0);
        assert_eq!(text("NOT"), 0.0);
        assert_eq!(text("-5"), 0.0);
        assert_eq!(estimate(&RawValue::Missing), 0.0);
    }

    #[test]
    fn lenient_numeric_prefix() {
        assert_eq!(text("12abc"), 12.0);
        assert_eq!(text("1e3"), 1_000.0);
        assert_eq!(text(".5K"), 500.0);
    }

    #[test]
    fn thousands_separators_are_removed() {
        assert_eq!(text("1,500"), 1_500.0);
        assert_eq!(text("2,000,000"), 2_000_000.0);
        // Every comma goes, so a decimal comma is not honored.
        assert_eq!(text("1,5K"), 15_000.0);
    }

    #[test]
    fn formats_with_suffix() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(1_500.0), "1.5K");
        assert_eq!(format_value(2e9), "2B");
        assert_eq!(format_value(1.234e12), "1.23T");
        assert_eq!(format_value(-1_380.0), "-1.38K");
        assert_eq!(format_value(5e15), "5QD");
    }

    proptest! {
        #[test]
        fn parse_is_idempotent(x in 0.0f64..1e18) {
            let once = estimate(&RawValue::Number(x));
            let twice = estimate(&RawValue::Text(once.to_string()));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn formatted_values_parse_back_close(x in 1.0f64..1e17) {
            let back = text(&format_value(x));
            prop_assert!((back - x).abs() <= x * 0.01);
        }
    }
}
