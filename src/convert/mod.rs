//! Value converters: raw computed CSS strings to typed token values.
//!
//! Every converter is pure and returns `None` for input it cannot parse so
//! callers can skip the single value and keep going.
//!
//! - [`color`] hex / `rgb()` / `hsl()` colors
//! - [`dimension`] `px` / `rem` lengths
//! - [`timing`] durations and easing functions
//! - [`shorthand`] `transition` and `box-shadow` decomposition

pub mod color;
pub mod dimension;
pub mod shorthand;
pub mod timing;

pub use color::{parse_color, to_hsl};
pub use dimension::{parse_dimension, parse_length};
pub use shorthand::{parse_box_shadow, parse_transition};
pub use timing::{easing_label, parse_duration, parse_easing};

/// Parses a plain CSS number (`"0.5"`, `"-2"`, `".25"`).
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parses `"50%"` into `50.0`.
pub(crate) fn parse_percentage(raw: &str) -> Option<f64> {
    parse_number(raw.trim().strip_suffix('%')?)
}

/// Splits a numeric prefix from its unit suffix: `"16px"` -> `(16.0, "px")`.
pub(crate) fn split_numeric(raw: &str) -> Option<(f64, &str)> {
    let trimmed = raw.trim();
    let split_at = trimmed
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_digit()
                || *c == '.'
                || ((*c == '-' || *c == '+') && *i == 0)
                || ((*c == 'e' || *c == 'E') && is_exponent(trimmed, *i)))
        })
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split_at);
    Some((parse_number(number)?, unit))
}

fn is_exponent(text: &str, index: usize) -> bool {
    let bytes = text.as_bytes();
    index > 0
        && bytes[index - 1].is_ascii_digit()
        && bytes
            .get(index + 1)
            .map(|b| b.is_ascii_digit() || *b == b'-' || *b == b'+')
            .unwrap_or(false)
}

/// Splits on `separator` while ignoring separators nested inside parentheses.
pub(crate) fn split_top_level(value: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in value.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == separator && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Splits on whitespace outside of parentheses.
pub(crate) fn split_words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in value.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Splits `name(a, b, c)` into the function name and its top-level arguments.
pub(crate) fn split_function(value: &str) -> Option<(&str, Vec<String>)> {
    let open = value.find('(')?;
    let body = value.trim_end().strip_suffix(')')?;
    let name = value[..open].trim();
    if name.is_empty() {
        return None;
    }
    let args = split_top_level(&body[open + 1..], ',');
    Some((name, args))
}

/// First entry of a comma-separated list (multiple transitions, shadows, ...).
pub(crate) fn first_entry(value: &str) -> Option<String> {
    split_top_level(value, ',').into_iter().next()
}
