//! Decomposition of `transition` and `box-shadow` shorthands.
//!
//! Both properties accept comma-separated lists; only the first entry is
//! converted.

use crate::types::{
    ColorValue, CubicBezierValue, DimensionValue, DurationValue, ShadowValue, TransitionValue,
};

use super::color::parse_color;
use super::dimension::parse_length;
use super::timing::{is_duration, is_easing, parse_duration, parse_easing};
use super::{first_entry, split_words};

/// First transition entry plus the property it animates.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransition {
    /// Animated property (`opacity`, `all`, ...), when named.
    pub property: Option<String>,
    pub value: TransitionValue,
}

/// Parses `"opacity 0.3s ease-in-out 0s"` style shorthands.
///
/// The first time value is the duration, the second the delay (default `0s`).
/// A missing timing function resolves to `ease`, the CSS initial value.
pub fn parse_transition(raw: &str) -> Option<ParsedTransition> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || value == "none" {
        return None;
    }
    let entry = first_entry(&value)?;

    let mut property = None;
    let mut duration: Option<DurationValue> = None;
    let mut delay: Option<DurationValue> = None;
    let mut timing = None;

    for word in split_words(&entry) {
        if is_duration(&word) {
            let parsed = parse_duration(&word)?;
            if duration.is_none() {
                duration = Some(parsed);
            } else if delay.is_none() {
                delay = Some(parsed);
            } else {
                return None;
            }
        } else if is_easing(&word) {
            timing = Some(parse_easing(&word));
        } else if property.is_none() {
            property = Some(word);
        } else {
            return None;
        }
    }

    Some(ParsedTransition {
        property,
        value: TransitionValue {
            duration: duration?,
            delay: delay.unwrap_or_else(|| DurationValue::seconds(0.0)),
            timing_function: timing.unwrap_or(CubicBezierValue::EASE),
        },
    })
}

/// Parses the first `box-shadow` entry.
///
/// Accepts the computed form (`rgba(0, 0, 0, 0.1) 0px 4px 6px -1px`) and the
/// authored form with the color last. Missing blur/spread default to `0px`,
/// a missing color to opaque black. Invisible shadows are rejected.
pub fn parse_box_shadow(raw: &str) -> Option<ShadowValue> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || value == "none" {
        return None;
    }
    let entry = first_entry(&value)?;

    let mut inset = false;
    let mut color: Option<ColorValue> = None;
    let mut lengths: Vec<DimensionValue> = Vec::new();

    for word in split_words(&entry) {
        if word == "inset" {
            inset = true;
        } else if let Some(length) = parse_length(&word) {
            lengths.push(length);
        } else if looks_like_color(&word) {
            // A transparent color parses to None: the shadow is invisible.
            color = Some(parse_color(&word)?);
        } else {
            return None;
        }
    }

    if !(2..=4).contains(&lengths.len()) {
        return None;
    }
    let mut lengths = lengths.into_iter();
    let offset_x = lengths.next()?;
    let offset_y = lengths.next()?;
    let blur = lengths.next().unwrap_or_else(DimensionValue::zero);
    let spread = lengths.next().unwrap_or_else(DimensionValue::zero);
    if blur.value < 0.0 {
        return None;
    }

    Some(ShadowValue {
        color: color.unwrap_or_else(|| ColorValue::from_rgb8(0.0, 0.0, 0.0, 1.0)),
        offset_x,
        offset_y,
        blur,
        spread,
        inset,
    })
}

fn looks_like_color(word: &str) -> bool {
    word.starts_with('#')
        || word.starts_with("rgb")
        || word.starts_with("hsl")
        || word == "transparent"
        || word == "currentcolor"
}
