//! Safe numeric coercion for loosely typed business data.
//!
//! Ratings, counts and prices are stored the way they are displayed
//! (`"4.9"`, `"100+"`, `"$1,299 one-time setup"`). Every builder that emits a
//! number goes through these helpers. The contract is uniform: a value that
//! cannot be read as a finite, non-negative number yields `None`, and the
//! caller omits the field. Nothing here ever produces `NaN` or infinity.

use std::sync::LazyLock;

use regex::Regex;

use sitegraph_shared::LooseNumber;

/// Upper bound of the review rating scale.
pub const RATING_BEST: f64 = 5.0;

/// Lower bound of the review rating scale.
pub const RATING_WORST: f64 = 1.0;

/// A display number: digits with optional thousands separators, optional
/// fraction, and an optional trailing `+` or `★` marker.
static DISPLAY_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?\s*[+★]?$").expect("valid regex")
});

/// The first dollar amount inside a price label.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?").expect("valid regex")
});

/// Coerce a loose value into a finite, non-negative number.
pub fn coerce_number(raw: Option<&LooseNumber>) -> Option<f64> {
    let value = match raw? {
        LooseNumber::Number(n) => *n,
        LooseNumber::Text(text) => parse_display_number(text)?,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Coerce a rating on the fixed 1–5 scale. Out-of-scale values are omitted.
pub fn coerce_rating(raw: Option<&LooseNumber>) -> Option<f64> {
    coerce_number(raw).filter(|v| (RATING_WORST..=RATING_BEST).contains(v))
}

/// Coerce a whole-number count. `"100+"` reads as `100`; fractional values
/// are not counts and are omitted.
pub fn coerce_count(raw: Option<&LooseNumber>) -> Option<u64> {
    let value = coerce_number(raw)?;
    if value.fract() != 0.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}

/// Extract the first dollar amount from a price label such as
/// `"Starting at $1,999+ (scope depends on volume)"`.
pub fn coerce_price(label: Option<&str>) -> Option<f64> {
    let caps = PRICE_RE.captures(label?)?;
    let text = format!(
        "{}{}",
        &caps[1],
        caps.get(2).map(|m| m.as_str()).unwrap_or_default()
    );
    parse_plain(&text)
}

fn parse_display_number(text: &str) -> Option<f64> {
    let caps = DISPLAY_NUMBER_RE.captures(text.trim())?;
    let text = format!(
        "{}{}",
        &caps[1],
        caps.get(2).map(|m| m.as_str()).unwrap_or_default()
    );
    parse_plain(&text)
}

fn parse_plain(digits: &str) -> Option<f64> {
    digits
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
