use palette::{FromColor, Hsl, Srgb};

use crate::types::ColorValue;

use super::{parse_number, parse_percentage, split_function};

/// Values that never become color tokens, compared case-insensitively.
const SKIPPED_COLORS: [&str; 7] = [
    "none",
    "transparent",
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "auto",
];

/// Converts a computed CSS color into a [`ColorValue`].
///
/// Returns `None` for unparseable input, skip-listed keywords and fully
/// transparent colors. Named colors are expected to arrive already resolved
/// to `rgb()` by the browser.
pub fn parse_color(raw: &str) -> Option<ColorValue> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || SKIPPED_COLORS.contains(&value.as_str()) {
        return None;
    }

    let color = if let Some(hex) = value.strip_prefix('#') {
        parse_hex(hex)?
    } else if let Some((name, args)) = split_function(&value) {
        match name {
            "rgb" | "rgba" => parse_rgb_args(&args)?,
            "hsl" | "hsla" => parse_hsl_args(&args)?,
            _ => return None,
        }
    } else {
        return None;
    };

    if color.is_transparent() {
        None
    } else {
        Some(color)
    }
}

fn parse_hex(digits: &str) -> Option<ColorValue> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let red = byte(0)?;
    let green = byte(2)?;
    let blue = byte(4)?;
    let alpha = if expanded.len() == 8 {
        byte(6)? as f64 / 255.0
    } else {
        1.0
    };
    Some(ColorValue::from_rgb8(
        red as f64,
        green as f64,
        blue as f64,
        alpha,
    ))
}

/// Splits `rgb()`/`hsl()` arguments in either the legacy comma syntax or the
/// modern space syntax with an optional `/ alpha`.
fn color_args(args: &[String]) -> Option<(Vec<String>, Option<String>)> {
    if args.len() > 1 {
        let mut channels = args.to_vec();
        let alpha = if channels.len() == 4 {
            channels.pop()
        } else {
            None
        };
        return (channels.len() == 3).then_some((channels, alpha));
    }

    let body = args.first()?;
    let (channels, alpha) = match body.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim().to_string())),
        None => (body.as_str(), None),
    };
    let channels: Vec<String> = channels.split_whitespace().map(str::to_string).collect();
    (channels.len() == 3).then_some((channels, alpha))
}

fn parse_alpha(raw: Option<&str>) -> Option<f64> {
    match raw {
        None => Some(1.0),
        Some(value) => {
            let alpha = match parse_percentage(value) {
                Some(pct) => pct / 100.0,
                None => parse_number(value)?,
            };
            Some(alpha.clamp(0.0, 1.0))
        }
    }
}

fn parse_rgb_args(args: &[String]) -> Option<ColorValue> {
    let (channels, alpha) = color_args(args)?;
    let channel = |raw: &str| -> Option<f64> {
        match parse_percentage(raw) {
            Some(pct) => Some(pct / 100.0 * 255.0),
            None => parse_number(raw),
        }
    };
    let red = channel(&channels[0])?;
    let green = channel(&channels[1])?;
    let blue = channel(&channels[2])?;
    let alpha = parse_alpha(alpha.as_deref())?;
    Some(ColorValue::from_rgb8(red, green, blue, alpha))
}

fn parse_hsl_args(args: &[String]) -> Option<ColorValue> {
    let (channels, alpha) = color_args(args)?;
    let hue_raw = channels[0].trim_end_matches("deg");
    let hue = parse_number(hue_raw)?;
    let saturation = parse_percentage(&channels[1]).or_else(|| parse_number(&channels[1]))?;
    let lightness = parse_percentage(&channels[2]).or_else(|| parse_number(&channels[2]))?;
    let alpha = parse_alpha(alpha.as_deref())?;

    let hsl: Hsl = Hsl::new(
        hue as f32,
        (saturation / 100.0).clamp(0.0, 1.0) as f32,
        (lightness / 100.0).clamp(0.0, 1.0) as f32,
    );
    let rgb: Srgb = Srgb::from_color(hsl);
    Some(ColorValue::from_unit_rgb(
        rgb.red as f64,
        rgb.green as f64,
        rgb.blue as f64,
        alpha,
    ))
}

/// Hue (degrees), saturation and lightness (0-1) of a color, for naming.
pub fn to_hsl(color: &ColorValue) -> (f64, f64, f64) {
    let [r, g, b] = color.components;
    let hsl: Hsl = Hsl::from_color(Srgb::new(r as f32, g as f32, b as f32));
    (
        hsl.hue.into_positive_degrees() as f64,
        hsl.saturation as f64,
        hsl.lightness as f64,
    )
}
