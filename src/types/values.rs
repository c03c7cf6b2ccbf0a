//! Typed token value structures.
//!
//! Every value carries numbers, never string-encoded dimensions. Each type
//! implements [`CanonicalKey`] so that equivalent values observed through
//! different raw CSS strings collapse to the same aggregation key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Produces the identity used to deduplicate values across pages.
pub trait CanonicalKey {
    fn canonical_key(&self) -> String;
}

/// Formats a number rounded to 4 decimals without trailing zeros.
///
/// `16.0` becomes `"16"`, `0.30000001` becomes `"0.3"`, `-0.0` becomes `"0"`.
pub fn format_number(value: f64) -> String {
    let rounded = round_to(value, 4);
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.4}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    #[default]
    Srgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorValue {
    pub color_space: ColorSpace,
    /// Red, green and blue in the 0-1 range.
    pub components: [f64; 3],
    pub alpha: f64,
    /// Lowercase `#rrggbb`, alpha stripped.
    pub hex: String,
}

impl ColorValue {
    /// Builds a color from 0-255 channel values and a 0-1 alpha.
    pub fn from_rgb8(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        let clamp8 = |v: f64| v.clamp(0.0, 255.0);
        let (r, g, b) = (clamp8(red), clamp8(green), clamp8(blue));
        Self::from_unit_rgb(r / 255.0, g / 255.0, b / 255.0, alpha)
    }

    /// Builds a color from 0-1 channel values and a 0-1 alpha.
    pub fn from_unit_rgb(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        let unit = |v: f64| v.clamp(0.0, 1.0);
        let components = [unit(red), unit(green), unit(blue)];
        let byte = |v: f64| (v * 255.0).round() as u8;
        let hex = format!(
            "#{:02x}{:02x}{:02x}",
            byte(components[0]),
            byte(components[1]),
            byte(components[2])
        );
        Self {
            color_space: ColorSpace::Srgb,
            components: components.map(|c| round_to(c, 4)),
            alpha: round_to(unit(alpha), 3),
            hex,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

impl CanonicalKey for ColorValue {
    fn canonical_key(&self) -> String {
        format!("{}/{}", self.hex, format_number(self.alpha))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Px,
    Rem,
}

impl DimensionUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionUnit::Px => "px",
            DimensionUnit::Rem => "rem",
        }
    }
}

/// Root font size used when a rem value has to be placed on a px scale.
pub const ROOT_FONT_SIZE_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionValue {
    pub value: f64,
    pub unit: DimensionUnit,
}

impl DimensionValue {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Px,
        }
    }

    pub fn rem(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Rem,
        }
    }

    pub fn zero() -> Self {
        Self::px(0.0)
    }

    /// Value expressed in px, treating `1rem` as 16px.
    pub fn to_px(&self) -> f64 {
        match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Rem => self.value * ROOT_FONT_SIZE_PX,
        }
    }

    pub fn is_zero(&self) -> bool {
        round_to(self.value, 4) == 0.0
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit.as_str())
    }
}

impl CanonicalKey for DimensionValue {
    fn canonical_key(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Ms,
    S,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Ms => "ms",
            DurationUnit::S => "s",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationValue {
    pub value: f64,
    pub unit: DurationUnit,
}

impl DurationValue {
    pub fn seconds(value: f64) -> Self {
        Self {
            value,
            unit: DurationUnit::S,
        }
    }

    pub fn millis(value: f64) -> Self {
        Self {
            value,
            unit: DurationUnit::Ms,
        }
    }

    pub fn to_millis(&self) -> f64 {
        match self.unit {
            DurationUnit::Ms => self.value,
            DurationUnit::S => self.value * 1000.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        round_to(self.value, 4) == 0.0
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit.as_str())
    }
}

impl CanonicalKey for DurationValue {
    fn canonical_key(&self) -> String {
        self.to_string()
    }
}

/// Cubic bezier control points `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezierValue(pub [f64; 4]);

impl CubicBezierValue {
    pub const LINEAR: CubicBezierValue = CubicBezierValue([0.0, 0.0, 1.0, 1.0]);
    pub const EASE: CubicBezierValue = CubicBezierValue([0.25, 0.1, 0.25, 1.0]);
    pub const EASE_IN: CubicBezierValue = CubicBezierValue([0.42, 0.0, 1.0, 1.0]);
    pub const EASE_OUT: CubicBezierValue = CubicBezierValue([0.0, 0.0, 0.58, 1.0]);
    pub const EASE_IN_OUT: CubicBezierValue = CubicBezierValue([0.42, 0.0, 0.58, 1.0]);

    pub fn points(&self) -> [f64; 4] {
        self.0
    }
}

impl CanonicalKey for CubicBezierValue {
    fn canonical_key(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(|p| format_number(*p)).collect();
        format!("cubic-bezier({})", parts.join(","))
    }
}

/// Border line style keyword (`solid`, `dashed`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeStyleValue(pub String);

impl CanonicalKey for StrokeStyleValue {
    fn canonical_key(&self) -> String {
        self.0.clone()
    }
}

/// A single family or an ordered font stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontFamily {
    Single(String),
    Stack(Vec<String>),
}

impl FontFamily {
    pub fn from_stack(mut families: Vec<String>) -> Option<Self> {
        match families.len() {
            0 => None,
            1 => families.pop().map(FontFamily::Single),
            _ => Some(FontFamily::Stack(families)),
        }
    }

    pub fn families(&self) -> Vec<&str> {
        match self {
            FontFamily::Single(name) => vec![name.as_str()],
            FontFamily::Stack(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn primary(&self) -> &str {
        match self {
            FontFamily::Single(name) => name,
            FontFamily::Stack(names) => names.first().map(String::as_str).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(f64),
    Keyword(String),
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontWeight::Numeric(n) => write!(f, "{}", format_number(*n)),
            FontWeight::Keyword(k) => write!(f, "{}", k),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyValue {
    pub font_family: FontFamily,
    pub font_size: DimensionValue,
    pub font_weight: FontWeight,
    /// Unitless multiple of the font size.
    pub line_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<DimensionValue>,
}

impl CanonicalKey for TypographyValue {
    fn canonical_key(&self) -> String {
        let letter_spacing = self
            .letter_spacing
            .map(|d| d.canonical_key())
            .unwrap_or_else(|| "normal".to_string());
        format!(
            "{}|{}|{}|{}|{}",
            self.font_family.families().join(","),
            self.font_size.canonical_key(),
            self.font_weight,
            format_number(self.line_height),
            letter_spacing
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowValue {
    pub color: ColorValue,
    pub offset_x: DimensionValue,
    pub offset_y: DimensionValue,
    pub blur: DimensionValue,
    pub spread: DimensionValue,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inset: bool,
}

impl CanonicalKey for ShadowValue {
    fn canonical_key(&self) -> String {
        format!(
            "{}{}|{}|{}|{}|{}",
            if self.inset { "inset|" } else { "" },
            self.offset_x.canonical_key(),
            self.offset_y.canonical_key(),
            self.blur.canonical_key(),
            self.spread.canonical_key(),
            self.color.canonical_key()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionValue {
    pub duration: DurationValue,
    pub delay: DurationValue,
    pub timing_function: CubicBezierValue,
}

impl CanonicalKey for TransitionValue {
    fn canonical_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.duration.canonical_key(),
            self.delay.canonical_key(),
            self.timing_function.canonical_key()
        )
    }
}
