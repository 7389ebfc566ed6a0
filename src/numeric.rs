//! Parsing of the loosely formatted numbers found on quote and listing pages.
//!
//! Handles values like `"$3.50"`, `"+12.00%"`, `"650K"` or `"2.1M"`. The unit
//! suffix is read from the original text before anything is stripped, since
//! the cleanup that removes `$`, `,` and signs removes the letters too.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d.]").expect("static pattern compiles"));

/// Suffix multipliers, checked in this order. First match wins, so
/// malformed input such as `"1KM"` resolves to the `M` multiplier.
const SUFFIXES: &[(char, f64)] = &[('B', 1_000_000_000.0), ('M', 1_000_000.0), ('K', 1_000.0)];

/// Returns the multiplier implied by a K/M/B marker anywhere in `text`
/// (case-insensitive), or `1.0` when there is none.
pub fn suffix_multiplier(text: &str) -> f64 {
    let upper = text.to_uppercase();
    SUFFIXES
        .iter()
        .find(|(marker, _)| upper.contains(*marker))
        .map(|(_, mult)| *mult)
        .unwrap_or(1.0)
}

/// Parse a suffixed human-readable number into its scalar magnitude.
///
/// Everything except digits and `.` is discarded before the numeric part is
/// read. Returns `None` when no digits survive or the remainder is not a
/// valid decimal (e.g. `"1.2.3"`).
pub fn parse_magnitude(text: &str) -> Option<f64> {
    let digits = NON_NUMERIC.replace_all(text.trim(), "");
    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: f64 = digits.parse().ok()?;
    Some(number * suffix_multiplier(text))
}

/// Parse a listing volume cell.
///
/// Suffixed values go through [`parse_magnitude`]. Unsuffixed values must be
/// plain integers once thousands separators are removed, so `"100.5"` is
/// rejected while `"100.5K"` is accepted. Prices and percentages have no such
/// restriction; the asymmetry matches the listing's historical handling.
/// Volumes carry no sign, so a leading sign makes the cell unreadable.
pub fn parse_volume(text: &str) -> Option<u64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.starts_with(['-', '\u{2212}', '+']) {
        return None;
    }
    if suffix_multiplier(&cleaned) != 1.0 {
        return parse_magnitude(&cleaned).map(|v| v.round() as u64);
    }
    cleaned.parse().ok()
}

/// Parse a price cell such as `"$1,234.50"`.
pub fn parse_price(text: &str) -> Option<f64> {
    text.trim().replace(['$', ','], "").parse().ok()
}

/// Parse a signed percent cell such as `"+12.00%"` or `"-3.1%"`.
pub fn parse_percent(text: &str) -> Option<f64> {
    text.trim().replace(['%', '+', ','], "").parse().ok()
}
