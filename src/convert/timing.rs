use crate::types::{CubicBezierValue, DurationValue};

use super::{parse_number, split_function, split_numeric};

/// Named easing keywords and their control points.
const EASING_KEYWORDS: [(&str, CubicBezierValue); 5] = [
    ("linear", CubicBezierValue::LINEAR),
    ("ease", CubicBezierValue::EASE),
    ("ease-in", CubicBezierValue::EASE_IN),
    ("ease-out", CubicBezierValue::EASE_OUT),
    ("ease-in-out", CubicBezierValue::EASE_IN_OUT),
];

/// Converts `"300ms"` / `"0.3s"` into a [`DurationValue`], keeping the unit.
pub fn parse_duration(raw: &str) -> Option<DurationValue> {
    let value = raw.trim().to_ascii_lowercase();
    let (number, unit) = split_numeric(&value)?;
    if number < 0.0 {
        return None;
    }
    match unit {
        "ms" => Some(DurationValue::millis(number)),
        "s" => Some(DurationValue::seconds(number)),
        _ => None,
    }
}

/// Returns true when the word looks like a time value (`0.3s`, `150ms`).
pub(crate) fn is_duration(word: &str) -> bool {
    parse_duration(word).is_some()
}

/// Resolves a timing function to its control points.
///
/// Literal `cubic-bezier()` values are parsed; named keywords map to their
/// standard curves. Anything else, `steps()` included, falls back to linear.
pub fn parse_easing(raw: &str) -> CubicBezierValue {
    let value = raw.trim().to_ascii_lowercase();
    if let Some((_, bezier)) = EASING_KEYWORDS.iter().find(|(name, _)| *name == value) {
        return *bezier;
    }
    parse_cubic_bezier(&value).unwrap_or(CubicBezierValue::LINEAR)
}

/// Returns true when the word is an easing keyword or timing function.
pub(crate) fn is_easing(word: &str) -> bool {
    let value = word.trim().to_ascii_lowercase();
    EASING_KEYWORDS.iter().any(|(name, _)| *name == value)
        || value.starts_with("cubic-bezier(")
        || value.starts_with("steps(")
        || value == "step-start"
        || value == "step-end"
}

fn parse_cubic_bezier(value: &str) -> Option<CubicBezierValue> {
    let (name, args) = split_function(value)?;
    if name != "cubic-bezier" || args.len() != 4 {
        return None;
    }
    let mut points = [0.0f64; 4];
    for (slot, arg) in points.iter_mut().zip(&args) {
        *slot = parse_number(arg)?;
    }
    // x coordinates must stay within [0, 1] for a valid timing curve.
    if !(0.0..=1.0).contains(&points[0]) || !(0.0..=1.0).contains(&points[2]) {
        return None;
    }
    Some(CubicBezierValue(points))
}

/// Human label for a curve: the keyword it matches, or `custom`.
pub fn easing_label(curve: &CubicBezierValue) -> &'static str {
    EASING_KEYWORDS
        .iter()
        .find(|(_, bezier)| {
            bezier
                .points()
                .iter()
                .zip(curve.points())
                .all(|(a, b)| (a - b).abs() < 1e-6)
        })
        .map(|(name, _)| *name)
        .unwrap_or("custom")
}
