use std::collections::BTreeSet;
use std::path::Path;

use crate::aggregate::{Observation, PageObservations, TokenAggregator, TokenRecord};
use crate::config::TypographyOptions;
use crate::convert::{parse_dimension, parse_length, split_numeric, split_top_level};
use crate::naming::{assign_names, value_slug, NameRequest};
use crate::types::{
    ElementStyle, FontFamily, FontWeight, PageStyles, TokenValue, TypographyValue,
};
use crate::Result;

use super::stats::{count_category, CategoryStats, PageStats, TypographyStats};
use super::{Extraction, Extractor, ExtractorKind};

pub const HEADING: &str = "heading";
pub const BODY: &str = "body";
pub const SPECIAL: &str = "special";

const NORMAL_LINE_HEIGHT: f64 = 1.2;

/// Selector, its role name and its sub-category.
const ROLES: &[(&str, &str, &str)] = &[
    ("h1", "heading-h1", HEADING),
    ("h2", "heading-h2", HEADING),
    ("h3", "heading-h3", HEADING),
    ("h4", "heading-h4", HEADING),
    ("h5", "heading-h5", HEADING),
    ("h6", "heading-h6", HEADING),
    ("p", "body-text", BODY),
    ("span", "body-inline", BODY),
    ("a", "body-link", BODY),
    ("li", "body-list-item", BODY),
    ("code", "code-inline", SPECIAL),
    ("pre", "code-block", SPECIAL),
    ("blockquote", "blockquote", SPECIAL),
    ("strong", "text-strong", SPECIAL),
    ("em", "text-emphasis", SPECIAL),
];

const PROPERTIES: &[&str] = &[
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "letter-spacing",
];

/// Collects one typography style per selector role.
#[derive(Debug, Clone)]
pub struct TypographyExtractor {
    options: TypographyOptions,
}

impl TypographyExtractor {
    pub fn new(options: TypographyOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    fn enabled(&self, category: &str) -> bool {
        match category {
            HEADING => self.options.include_headings,
            BODY => self.options.include_body_text,
            _ => self.options.include_special_text,
        }
    }

    fn roles(&self) -> impl Iterator<Item = &'static (&'static str, &'static str, &'static str)> + '_ {
        ROLES.iter().filter(|(_, _, category)| self.enabled(category))
    }

    fn observe(&self, page: &PageStyles) -> PageObservations<TypographyValue> {
        let mut observations = PageObservations::new(page.url.as_str());
        for (selector, _, category) in self.roles() {
            for element in page.elements_for(selector) {
                if let Some(value) = parse_typography(element) {
                    observations.push(
                        Observation::new(value, *category)
                            .scoped(selector)
                            .describe(format!("Text style of <{selector}> elements")),
                    );
                }
            }
        }
        observations
    }
}

impl Extractor for TypographyExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Typography
    }

    fn selectors(&self) -> Vec<&'static str> {
        self.roles().map(|(selector, _, _)| *selector).collect()
    }

    fn properties(&self) -> Vec<&'static str> {
        PROPERTIES.to_vec()
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

        let total_styles = aggregator.observations();
        let tokens = aggregator.finalize(self.options.minimum_occurrences, name_styles);

        let font_families: BTreeSet<String> = tokens
            .iter()
            .filter_map(|token| match &token.value {
                TokenValue::Typography(value) => {
                    Some(value.font_family.primary().to_ascii_lowercase())
                }
                _ => None,
            })
            .collect();

        let stats = TypographyStats {
            total_styles,
            unique_styles: tokens.len(),
            heading_styles: count_category(&tokens, HEADING),
            body_styles: count_category(&tokens, BODY),
            special_styles: count_category(&tokens, SPECIAL),
            font_families: font_families.len(),
            pages: page_stats,
        };

        Extraction {
            kind: ExtractorKind::Typography,
            tokens,
            stats: CategoryStats::Typography(stats),
        }
    }
}

/// Builds a typography value from an element's computed font properties.
///
/// Family and size are required; weight and line height fall back to their
/// CSS initial values when absent.
pub(crate) fn parse_typography(element: &ElementStyle) -> Option<TypographyValue> {
    let font_family = parse_font_family(element.style("font-family")?)?;
    let font_size = parse_dimension(element.style("font-size")?)?;
    if font_size.value < 0.0 {
        return None;
    }
    let font_weight = match element.style("font-weight") {
        Some(raw) => parse_font_weight(raw)?,
        None => FontWeight::Numeric(400.0),
    };
    let line_height = match element.style("line-height") {
        Some(raw) => parse_line_height(raw, font_size.to_px())?,
        None => NORMAL_LINE_HEIGHT,
    };
    let letter_spacing = element
        .style("letter-spacing")
        .and_then(parse_length)
        .filter(|spacing| !spacing.is_zero());

    Some(TypographyValue {
        font_family,
        font_size,
        font_weight,
        line_height,
        letter_spacing,
    })
}

fn parse_font_family(raw: &str) -> Option<FontFamily> {
    let families = split_top_level(raw, ',')
        .into_iter()
        .map(|family| family.trim_matches(|c: char| c == '"' || c == '\'').trim().to_string())
        .filter(|family| !family.is_empty())
        .collect();
    FontFamily::from_stack(families)
}

fn parse_font_weight(raw: &str) -> Option<FontWeight> {
    let trimmed = raw.trim();
    if let Ok(weight) = trimmed.parse::<f64>() {
        return (weight.is_finite() && weight > 0.0).then_some(FontWeight::Numeric(weight));
    }
    let keyword = trimmed.to_ascii_lowercase();
    match keyword.as_str() {
        "normal" | "bold" | "bolder" | "lighter" => Some(FontWeight::Keyword(keyword)),
        _ => None,
    }
}

/// Resolves a computed line height to a unitless multiple of the font size.
fn parse_line_height(raw: &str, font_size_px: f64) -> Option<f64> {
    if raw.trim().eq_ignore_ascii_case("normal") {
        return Some(NORMAL_LINE_HEIGHT);
    }
    let (number, unit) = split_numeric(raw)?;
    if number <= 0.0 {
        return None;
    }
    let ratio = match unit.trim() {
        "" => number,
        "%" => number / 100.0,
        _ => {
            let length = parse_length(raw)?;
            if font_size_px <= 0.0 {
                return None;
            }
            length.to_px() / font_size_px
        }
    };
    Some((ratio * 100.0).round() / 100.0)
}

fn role_name(scope: &str) -> &'static str {
    ROLES
        .iter()
        .find(|(selector, _, _)| *selector == scope)
        .map(|(_, name, _)| *name)
        .unwrap_or("text")
}

fn name_styles(records: &[TokenRecord<TypographyValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| record.value.font_size.to_px(),
        |record| {
            let scope = record.key.split("::").next().unwrap_or_default();
            let size = record.value.font_size;
            NameRequest::new(role_name(scope), value_slug(size.value, size.unit.as_str()))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DimensionValue;
    use std::collections::{BTreeMap, HashMap};

    fn element(styles: &[(&str, &str)]) -> ElementStyle {
        ElementStyle {
            styles: styles
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            ..ElementStyle::default()
        }
    }

    fn heading(size: &str, weight: &str) -> ElementStyle {
        element(&[
            ("font-family", "Inter, \"Helvetica Neue\", sans-serif"),
            ("font-size", size),
            ("font-weight", weight),
            ("line-height", "normal"),
            ("letter-spacing", "normal"),
        ])
    }

    fn page(url: &str, elements: Vec<(&str, Vec<ElementStyle>)>) -> PageStyles {
        PageStyles {
            url: url.to_string(),
            status: Some(200),
            elements: elements
                .into_iter()
                .map(|(selector, list)| (selector.to_string(), list))
                .collect::<BTreeMap<_, _>>(),
            ..PageStyles::default()
        }
    }

    #[test]
    fn parses_computed_font_properties() {
        let value = parse_typography(&element(&[
            ("font-family", "\"Fira Code\", monospace"),
            ("font-size", "16px"),
            ("font-weight", "700"),
            ("line-height", "24px"),
            ("letter-spacing", "0.5px"),
        ]))
        .unwrap();

        assert_eq!(
            value.font_family,
            FontFamily::Stack(vec!["Fira Code".into(), "monospace".into()])
        );
        assert_eq!(value.font_size, DimensionValue::px(16.0));
        assert_eq!(value.font_weight, FontWeight::Numeric(700.0));
        assert!((value.line_height - 1.5).abs() < 1e-9);
        assert_eq!(value.letter_spacing, Some(DimensionValue::px(0.5)));
    }

    #[test]
    fn normal_line_height_and_spacing() {
        let value = parse_typography(&heading("32px", "600")).unwrap();
        assert!((value.line_height - 1.2).abs() < 1e-9);
        assert!(value.letter_spacing.is_none());

        let single = parse_typography(&element(&[
            ("font-family", "Georgia"),
            ("font-size", "18px"),
            ("line-height", "1.6"),
        ]))
        .unwrap();
        assert_eq!(single.font_family, FontFamily::Single("Georgia".into()));
        assert!((single.line_height - 1.6).abs() < 1e-9);
        assert_eq!(single.font_weight, FontWeight::Numeric(400.0));
    }

    #[test]
    fn skips_elements_without_usable_size() {
        assert!(parse_typography(&element(&[("font-family", "Inter"), ("font-size", "auto")]))
            .is_none());
        assert!(parse_typography(&element(&[("font-size", "16px")])).is_none());
    }

    #[test]
    fn same_style_under_two_selectors_stays_two_tokens() {
        let extractor = TypographyExtractor::new(TypographyOptions::default()).unwrap();
        let pages = vec![page(
            "https://a.test/",
            vec![
                ("h2", vec![heading("24px", "700")]),
                ("h3", vec![heading("24px", "700")]),
            ],
        )];
        let extraction = extractor.extract(&pages);
        let mut names: Vec<&str> = extraction.tokens.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["heading-h2", "heading-h3"]);
        assert!(extraction.tokens.iter().all(|t| t.category == HEADING));
    }

    #[test]
    fn role_collisions_append_font_size() {
        let extractor = TypographyExtractor::new(TypographyOptions::default()).unwrap();
        let pages = vec![
            page("https://a.test/", vec![("h1", vec![heading("48px", "800")])]),
            page("https://a.test/blog", vec![("h1", vec![heading("36px", "700")])]),
        ];
        let extraction = extractor.extract(&pages);
        let names: Vec<(&str, f64)> = extraction
            .tokens
            .iter()
            .map(|t| match &t.value {
                TokenValue::Typography(v) => (t.name.as_str(), v.font_size.value),
                other => panic!("unexpected value {other:?}"),
            })
            .collect();
        assert!(names.contains(&("heading-h1", 36.0)));
        assert!(names.contains(&("heading-h1-48px", 48.0)));
    }

    #[test]
    fn sub_category_toggles_limit_selectors() {
        let options = TypographyOptions {
            include_headings: false,
            include_special_text: false,
            ..TypographyOptions::default()
        };
        let extractor = TypographyExtractor::new(options).unwrap();
        assert_eq!(extractor.selectors(), vec!["p", "span", "a", "li"]);

        let pages = vec![page(
            "https://a.test/",
            vec![
                ("h1", vec![heading("40px", "700")]),
                ("p", vec![heading("16px", "400")]),
            ],
        )];
        let extraction = extractor.extract(&pages);
        assert_eq!(extraction.tokens.len(), 1);
        assert_eq!(extraction.tokens[0].name, "body-text");
        match extraction.stats {
            CategoryStats::Typography(stats) => {
                assert_eq!(stats.body_styles, 1);
                assert_eq!(stats.heading_styles, 0);
                assert_eq!(stats.font_families, 1);
            }
            other => panic!("unexpected stats {other:?}"),
        }
    }
}
