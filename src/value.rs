//! Numeric classification and ordering of cell values.
//!
//! One classifier drives three decisions: right-aligning numeric cells,
//! choosing numeric vs. text comparison when sorting, and deciding which
//! values take part in sum/avg/min/max.

use std::cmp::Ordering;

use crate::types::CellValue;

/// Parse a string the way JavaScript's `Number()` does.
///
/// Surrounding whitespace is ignored and the empty string is `0`. Accepts
/// decimal and exponent notation, `0x`/`0o`/`0b` integer prefixes and
/// `Infinity` with an optional sign. Anything else (including Rust-only
/// spellings such as `inf` or `nan`) is rejected.
#[must_use]
pub fn js_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    let (sign, unsigned) = match t.as_bytes().first() {
        Some(b'-') => (-1.0, t.get(1..).unwrap_or("")),
        Some(b'+') => (1.0, t.get(1..).unwrap_or("")),
        _ => (1.0, t),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    // Radix prefixes are unsigned-only in JS.
    if unsigned.len() > 2 && unsigned.len() == t.len() {
        let radix = match unsigned.get(..2) {
            Some("0x" | "0X") => Some(16),
            Some("0o" | "0O") => Some(8),
            Some("0b" | "0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = unsigned.get(2..).unwrap_or("");
            return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
        }
    }

    let valid = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid || !unsigned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    t.parse::<f64>().ok()
}

/// True iff the value should be treated as a number.
///
/// Mirrors `!isNaN(v) && !isNaN(parseFloat(v))`: empty strings fail the
/// `parseFloat` half, `NaN` fails both.
#[must_use]
pub fn is_numeric(value: &CellValue) -> bool {
    numeric_value(value).is_some()
}

/// The numeric value of a cell when [`is_numeric`] holds.
#[must_use]
pub fn numeric_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_nan() => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) if s.trim().is_empty() => None,
        CellValue::Text(s) => js_number(s).filter(|n| !n.is_nan()),
    }
}

/// Compare two cells for sorting in ascending order.
///
/// Both numeric: numeric comparison. Both text: the string forms are
/// collated with [`locale_compare`]. A numeric cell always sorts before a
/// text cell, which keeps the order total over mixed columns.
#[must_use]
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_compare(&a.to_string(), &b.to_string()),
    }
}

/// Locale-style string collation.
///
/// Primary strength ignores case, so `apple < Banana < cherry`. Strings that
/// differ only in case put the lowercase form first. Everything else falls
/// back to code point order, which keeps Hangul syllables in dictionary
/// order since the Unicode block is laid out that way.
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if primary != Ordering::Equal {
        return primary;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            return match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => ca.cmp(&cb),
            };
        }
    }
    a.len().cmp(&b.len())
}

/// Format a number the way JavaScript's `String(n)` does.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{n}");
    }

    // JS switches to exponent form outside [1e-6, 1e21) and always signs
    // the exponent.
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test_case("42", Some(42.0) ; "integer")]
    #[test_case("  3.5 ", Some(3.5) ; "padded decimal")]
    #[test_case("1e3", Some(1000.0) ; "exponent")]
    #[test_case("-.5", Some(-0.5) ; "leading dot")]
    #[test_case("0x10", Some(16.0) ; "hex prefix")]
    #[test_case("0b101", Some(5.0) ; "binary prefix")]
    #[test_case("Infinity", Some(f64::INFINITY) ; "infinity")]
    #[test_case("", Some(0.0) ; "empty is zero")]
    #[test_case("abc", None ; "letters")]
    #[test_case("12px", None ; "trailing unit")]
    #[test_case("inf", None ; "rust only infinity")]
    #[test_case("NaN", None ; "nan")]
    #[test_case("1,000", None ; "thousands separator")]
    fn test_js_number(input: &str, expected: Option<f64>) {
        assert_eq!(js_number(input), expected);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric(&CellValue::Number(10.0)));
        assert!(is_numeric(&text("20")));
        assert!(!is_numeric(&text("")));
        assert!(!is_numeric(&text("   ")));
        assert!(!is_numeric(&text("abc")));
        assert!(!is_numeric(&CellValue::Number(f64::NAN)));
    }

    #[test]
    fn test_compare_numeric_beats_lexicographic() {
        assert_eq!(compare_cells(&text("9"), &text("10")), Ordering::Less);
        assert_eq!(
            compare_cells(&CellValue::Number(3.0), &text("10")),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_text_pairs_collate() {
        assert_eq!(compare_cells(&text("5x"), &text("9y")), Ordering::Less);
        assert_eq!(compare_cells(&text(""), &text("a")), Ordering::Less);
    }

    #[test]
    fn test_compare_numbers_before_text() {
        assert_eq!(compare_cells(&text("10"), &text("x")), Ordering::Less);
        assert_eq!(compare_cells(&text("5x"), &text("10")), Ordering::Greater);
        assert_eq!(compare_cells(&text("100"), &text("")), Ordering::Less);
    }

    #[test]
    fn test_compare_has_no_cycles() {
        // "10" < "5x" < "9" < "10" if mixed pairs collated as text
        let (a, b, c) = (text("10"), text("5x"), text("9"));
        assert_eq!(compare_cells(&c, &a), Ordering::Less);
        assert_eq!(compare_cells(&a, &b), Ordering::Less);
        assert_eq!(compare_cells(&c, &b), Ordering::Less);
    }

    #[test]
    fn test_locale_compare_case_insensitive() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Banana", "cherry"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_locale_compare_hangul() {
        assert_eq!(locale_compare("가나", "다라"), Ordering::Less);
        assert_eq!(locale_compare("하", "가"), Ordering::Greater);
    }

    #[test_case(10.0, "10" ; "integral")]
    #[test_case(11.5, "11.5" ; "fraction")]
    #[test_case(-3.0, "-3" ; "negative")]
    #[test_case(1e21, "1e+21" ; "large exponent")]
    #[test_case(1.5e-8, "1.5e-8" ; "small exponent")]
    #[test_case(f64::NEG_INFINITY, "-Infinity" ; "negative infinity")]
    fn test_format_number(n: f64, expected: &str) {
        assert_eq!(format_number(n), expected);
    }
}
