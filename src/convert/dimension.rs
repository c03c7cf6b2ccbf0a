use crate::types::DimensionValue;

use super::split_numeric;

/// Keywords computed styles may report instead of a length.
const NON_LENGTH_KEYWORDS: [&str; 6] = ["auto", "normal", "none", "inherit", "initial", "unset"];

/// Converts a `px`/`rem` length into a [`DimensionValue`], zero included.
///
/// Unitless `0` is accepted as `0px` since it is valid inside shorthands.
pub fn parse_length(raw: &str) -> Option<DimensionValue> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || NON_LENGTH_KEYWORDS.contains(&value.as_str()) {
        return None;
    }
    let (number, unit) = split_numeric(&value)?;
    match unit {
        "px" => Some(DimensionValue::px(number)),
        "rem" => Some(DimensionValue::rem(number)),
        "" if number == 0.0 => Some(DimensionValue::zero()),
        _ => None,
    }
}

/// Converts a length into a token-worthy [`DimensionValue`].
///
/// Same as [`parse_length`] but zero values are rejected: they carry no
/// design meaning as tokens.
pub fn parse_dimension(raw: &str) -> Option<DimensionValue> {
    parse_length(raw).filter(|d| !d.is_zero())
}
