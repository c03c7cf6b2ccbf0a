use std::path::Path;

use crate::aggregate::{Observation, PageObservations, TokenAggregator, TokenRecord};
use crate::config::ColorOptions;
use crate::convert::{parse_color, parse_length, to_hsl};
use crate::naming::{assign_names, NameRequest};
use crate::types::{ColorValue, PageStyles};
use crate::Result;

use super::stats::{count_category, CategoryStats, ColorStats, PageStats};
use super::{Extraction, Extractor, ExtractorKind};

pub const TEXT: &str = "text";
pub const BACKGROUND: &str = "background";
pub const BORDER: &str = "border";

const SELECTORS: &[&str] = &[
    "body", "header", "nav", "main", "section", "article", "aside", "footer", "div", "h1", "h2",
    "h3", "h4", "h5", "h6", "p", "span", "a", "li", "button", "input", "label",
];

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Collects text, background and border colors.
///
/// A color is one token regardless of where it is used; the token's category
/// is the sub-category it was first seen in.
#[derive(Debug, Clone)]
pub struct ColorExtractor {
    options: ColorOptions,
}

impl ColorExtractor {
    pub fn new(options: ColorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    fn observe(&self, page: &PageStyles) -> PageObservations<ColorValue> {
        let mut observations = PageObservations::new(page.url.as_str());
        for selector in SELECTORS {
            for element in page.elements_for(selector) {
                if self.options.include_text_colors {
                    if let Some(color) = element.style("color").and_then(parse_color) {
                        observations.push(Observation::new(color, TEXT));
                    }
                }
                if self.options.include_background_colors {
                    if let Some(color) = element.style("background-color").and_then(parse_color)
                    {
                        observations.push(Observation::new(color, BACKGROUND));
                    }
                }
                if self.options.include_border_colors {
                    for side in SIDES {
                        if !has_visible_border(|prop| element.style(prop), side) {
                            continue;
                        }
                        let property = format!("border-{side}-color");
                        if let Some(color) = element.style(&property).and_then(parse_color) {
                            observations.push(Observation::new(color, BORDER));
                        }
                    }
                }
            }
        }
        observations
    }
}

/// A border color only counts when that side actually draws a border.
/// Missing style/width data is treated as visible.
fn has_visible_border<'a>(style: impl Fn(&str) -> Option<&'a str>, side: &str) -> bool {
    let hidden_style = style(&format!("border-{side}-style"))
        .map(|s| matches!(s, "none" | "hidden"))
        .unwrap_or(false);
    let zero_width = style(&format!("border-{side}-width"))
        .and_then(parse_length)
        .map(|w| w.is_zero())
        .unwrap_or(false);
    !hidden_style && !zero_width
}

impl Extractor for ColorExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Color
    }

    fn selectors(&self) -> Vec<&'static str> {
        SELECTORS.to_vec()
    }

    fn properties(&self) -> Vec<&'static str> {
        let mut properties = Vec::new();
        if self.options.include_text_colors {
            properties.push("color");
        }
        if self.options.include_background_colors {
            properties.push("background-color");
        }
        if self.options.include_border_colors {
            properties.extend([
                "border-top-color",
                "border-right-color",
                "border-bottom-color",
                "border-left-color",
                "border-top-style",
                "border-right-style",
                "border-bottom-style",
                "border-left-style",
                "border-top-width",
                "border-right-width",
                "border-bottom-width",
                "border-left-width",
            ]);
        }
        properties
    }

    fn output_dir(&self) -> Option<&Path> {
        self.options.output_dir.as_deref()
    }

    fn extract(&self, pages: &[PageStyles]) -> Extraction {
        let (page_stats, usable) = PageStats::partition(pages);
        let mut aggregator = TokenAggregator::new();
        for page in usable {
            aggregator.merge(self.observe(page));
        }

        let total_colors = aggregator.observations();
        let tokens = aggregator.finalize(self.options.minimum_occurrences, name_colors);

        let stats = ColorStats {
            total_colors,
            unique_colors: tokens.len(),
            text_colors: count_category(&tokens, TEXT),
            background_colors: count_category(&tokens, BACKGROUND),
            border_colors: count_category(&tokens, BORDER),
            pages: page_stats,
        };

        Extraction {
            kind: ExtractorKind::Color,
            tokens,
            stats: CategoryStats::Color(stats),
        }
    }
}

/// Hue family for a color, or `None` when it is achromatic.
fn hue_family(hue: f64, saturation: f64) -> Option<&'static str> {
    if saturation < 0.1 {
        return None;
    }
    Some(match hue {
        h if h < 15.0 => "red",
        h if h < 45.0 => "orange",
        h if h < 70.0 => "yellow",
        h if h < 165.0 => "green",
        h if h < 190.0 => "teal",
        h if h < 260.0 => "blue",
        h if h < 300.0 => "purple",
        h if h < 345.0 => "pink",
        _ => "red",
    })
}

/// Maps lightness onto the 50..950 shade scale; darker is higher.
fn shade(lightness: f64) -> u32 {
    match ((1.0 - lightness.clamp(0.0, 1.0)) * 10.0).round() as u32 {
        0 => 50,
        10 => 950,
        step => step * 100,
    }
}

pub(crate) fn color_base_name(color: &ColorValue) -> String {
    let (hue, saturation, lightness) = to_hsl(color);
    match hue_family(hue, saturation) {
        Some(family) => format!("{family}-{}", shade(lightness)),
        None if lightness <= 0.05 => "black".to_string(),
        None if lightness >= 0.95 => "white".to_string(),
        None => format!("gray-{}", shade(lightness)),
    }
}

fn color_qualifier(color: &ColorValue) -> String {
    let hex = color.hex.trim_start_matches('#');
    if color.is_opaque() {
        hex.to_string()
    } else {
        format!("{hex}-a{}", (color.alpha * 100.0).round() as u32)
    }
}

fn name_colors(records: &[TokenRecord<ColorValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| 1.0 - to_hsl(&record.value).2,
        |record| NameRequest::new(color_base_name(&record.value), color_qualifier(&record.value)),
    )
}
