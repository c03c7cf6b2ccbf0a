use std::path::Path;

use crate::aggregate::{Observation, PageObservations, TokenAggregator, TokenRecord};
use crate::config::BorderOptions;
use crate::convert::{parse_box_shadow, parse_dimension, parse_percentage, split_words};
use crate::naming::{assign_names, bucket, number_slug, value_slug, NameRequest};
use crate::types::{
    CanonicalKey, DimensionValue, PageStyles, ShadowValue, StrokeStyleValue, TokenValue,
};
use crate::Result;

use super::stats::{count_category, BorderStats, CategoryStats, PageStats};
use super::{Extraction, Extractor, ExtractorKind};

pub const WIDTH: &str = "width";
pub const STYLE: &str = "style";
pub const RADIUS: &str = "radius";
pub const SHADOW: &str = "shadow";

/// Radius used for pill and circle shapes.
pub const FULL_RADIUS_PX: f64 = 9999.0;

const SELECTORS: &[&str] = &[
    "header", "nav", "main", "section", "article", "aside", "footer", "div", "button", "input",
    "select", "textarea", "img", "a", "table", "td", "th", "hr", "blockquote", "pre", "code",
];

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];
const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];
const STROKE_STYLES: &[&str] = &[
    "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];

/// Collects border widths, styles, radii and box shadows.
///
/// All sub-categories share one aggregator with scoped keys, so usage ties
/// across sub-categories keep discovery order.
#[derive(Debug, Clone)]
pub struct BorderExtractor {
    options: BorderOptions,
}

/// A border value tagged with its sub-category.
#[derive(Debug, Clone, PartialEq)]
enum BorderValue {
    Width(DimensionValue),
    Style(StrokeStyleValue),
    Radius(DimensionValue),
    Shadow(ShadowValue),
}

impl BorderValue {
    fn category(&self) -> &'static str {
        match self {
            BorderValue::Width(_) => WIDTH,
            BorderValue::Style(_) => STYLE,
            BorderValue::Radius(_) => RADIUS,
            BorderValue::Shadow(_) => SHADOW,
        }
    }

    fn width(&self) -> Option<DimensionValue> {
        match self {
            BorderValue::Width(width) => Some(*width),
            _ => None,
        }
    }

    fn style(&self) -> Option<StrokeStyleValue> {
        match self {
            BorderValue::Style(style) => Some(style.clone()),
            _ => None,
        }
    }

    fn radius(&self) -> Option<DimensionValue> {
        match self {
            BorderValue::Radius(radius) => Some(*radius),
            _ => None,
        }
    }

    fn shadow(&self) -> Option<ShadowValue> {
        match self {
            BorderValue::Shadow(shadow) => Some(shadow.clone()),
            _ => None,
        }
    }

    fn observe(self) -> Observation<BorderValue> {
        let category = self.category();
        Observation::new(self, category).scoped(category)
    }
}

impl CanonicalKey for BorderValue {
    fn canonical_key(&self) -> String {
        match self {
            BorderValue::Width(value) | BorderValue::Radius(value) => value.canonical_key(),
            BorderValue::Style(value) => value.canonical_key(),
            BorderValue::Shadow(value) => value.canonical_key(),
        }
    }
}

impl From<BorderValue> for TokenValue {
    fn from(value: BorderValue) -> Self {
        match value {
            BorderValue::Width(value) | BorderValue::Radius(value) => value.into(),
            BorderValue::Style(value) => value.into(),
            BorderValue::Shadow(value) => value.into(),
        }
    }
}

impl BorderExtractor {
    pub fn new(options: BorderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    fn observe(&self, page: &PageStyles) -> PageObservations<BorderValue> {
        let mut observations = PageObservations::new(page.url.as_str());
        for selector in SELECTORS {
            for element in page.elements_for(selector) {
                for side in SIDES {
                    let style = element.style(&format!("border-{side}-style"));
                    if self.options.include_styles {
                        if let Some(stroke) = style.and_then(parse_stroke_style) {
                            observations.push(BorderValue::Style(stroke).observe());
                        }
                    }
                    if self.options.include_widths && !style.map(is_hidden_style).unwrap_or(false)
                    {
                        if let Some(width) = element
                            .style(&format!("border-{side}-width"))
                            .and_then(parse_border_width)
                        {
                            observations.push(BorderValue::Width(width).observe());
                        }
                    }
                }
                if self.options.include_radii {
                    for corner in CORNERS {
                        if let Some(radius) = element
                            .style(&format!("border-{corner}-radius"))
                            .and_then(parse_radius)
                        {
                            observations.push(BorderValue::Radius(radius).observe());
                        }
                    }
                }
                if self.options.include_shadows {
                    if let Some(shadow) = element.style("box-shadow").and_then(parse_box_shadow) {
                        observations.push(BorderValue::Shadow(shadow).observe());
                    }
                }
            }
        }
        observations
    }
}

impl Extractor for BorderExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Border
    }

    fn selectors(&self) -> Vec<&'static str> {
        SELECTORS.to_vec()
    }

    fn properties(&self) -> Vec<&'static str> {
        let mut properties = Vec::new();
        if self.options.include_widths || self.options.include_styles {
            properties.extend([
                "border-top-style",
                "border-right-style",
                "border-bottom-style",
                "border-left-style",
            ]);
        }
        if self.options.include_widths {
            properties.extend([
                "border-top-width",
                "border-right-width",
                "border-bottom-width",
                "border-left-width",
            ]);
        }
        if self.options.include_radii {
            properties.extend([
                "border-top-left-radius",
                "border-top-right-radius",
                "border-bottom-right-radius",
                "border-bottom-left-radius",
            ]);
        }
        if self.options.include_shadows {
            properties.push("box-shadow");
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

        let total_values = aggregator.observations();
        let tokens = aggregator.finalize(self.options.minimum_occurrences, name_borders);

        let stats = BorderStats {
            total_values,
            unique_values: tokens.len(),
            width_values: count_category(&tokens, WIDTH),
            style_values: count_category(&tokens, STYLE),
            radius_values: count_category(&tokens, RADIUS),
            shadow_values: count_category(&tokens, SHADOW),
            pages: page_stats,
        };

        Extraction {
            kind: ExtractorKind::Border,
            tokens,
            stats: CategoryStats::Border(stats),
        }
    }
}

fn is_hidden_style(style: &str) -> bool {
    matches!(style.to_ascii_lowercase().as_str(), "none" | "hidden")
}

fn parse_stroke_style(raw: &str) -> Option<StrokeStyleValue> {
    let style = raw.trim().to_ascii_lowercase();
    STROKE_STYLES
        .contains(&style.as_str())
        .then_some(StrokeStyleValue(style))
}

/// Border widths, with the `thin`/`medium`/`thick` keywords resolved. The
/// resolved widths sit on the upper bounds of the matching name buckets.
pub(crate) fn parse_border_width(raw: &str) -> Option<DimensionValue> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "thin" => Some(DimensionValue::px(1.0)),
        "medium" => Some(DimensionValue::px(3.0)),
        "thick" => Some(DimensionValue::px(5.0)),
        other => parse_dimension(other).filter(|w| w.value > 0.0),
    }
}

/// Corner radius; elliptical radii use the horizontal value and half or
/// more of the box becomes the full radius.
pub(crate) fn parse_radius(raw: &str) -> Option<DimensionValue> {
    let first = split_words(raw.trim()).into_iter().next()?;
    if let Some(percent) = parse_percentage(&first) {
        return (percent >= 50.0).then(|| DimensionValue::px(FULL_RADIUS_PX));
    }
    let radius = parse_dimension(&first)?;
    if radius.value <= 0.0 {
        return None;
    }
    if radius.to_px() >= FULL_RADIUS_PX {
        return Some(DimensionValue::px(FULL_RADIUS_PX));
    }
    Some(radius)
}

/// Names each sub-category with its own rules, keeping record order.
fn name_borders(records: &[TokenRecord<BorderValue>]) -> Vec<String> {
    let mut names = vec![String::new(); records.len()];
    name_subset(records, &mut names, BorderValue::width, name_widths);
    name_subset(records, &mut names, BorderValue::style, name_styles);
    name_subset(records, &mut names, BorderValue::radius, name_radii);
    name_subset(records, &mut names, BorderValue::shadow, name_shadows);
    names
}

fn name_subset<T, P, N>(
    records: &[TokenRecord<BorderValue>],
    names: &mut [String],
    pick: P,
    namer: N,
) where
    P: Fn(&BorderValue) -> Option<T>,
    N: Fn(&[TokenRecord<T>]) -> Vec<String>,
{
    let (indices, subset): (Vec<usize>, Vec<TokenRecord<T>>) = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            pick(&record.value).map(|value| (idx, record.with_value(value)))
        })
        .unzip();
    for (idx, name) in indices.into_iter().zip(namer(&subset)) {
        names[idx] = name;
    }
}

fn raw_slug(value: &DimensionValue) -> String {
    value_slug(value.value, value.unit.as_str())
}

fn name_widths(records: &[TokenRecord<DimensionValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| record.value.to_px(),
        |record| {
            let label = bucket(
                record.value.to_px(),
                &[(1.0, "thin"), (3.0, "medium"), (5.0, "thick")],
                "heavy",
            );
            NameRequest::new(format!("border-width-{label}"), raw_slug(&record.value))
        },
    )
}

fn name_styles(records: &[TokenRecord<StrokeStyleValue>]) -> Vec<String> {
    assign_names(
        records,
        |_| 0.0,
        |record| NameRequest::new(format!("border-{}", record.value.0), ""),
    )
}

pub(crate) fn radius_label(px: f64) -> &'static str {
    if px <= 4.0 {
        "sm"
    } else if px <= 8.0 {
        "md"
    } else if px < 999.0 {
        "lg"
    } else {
        "full"
    }
}

fn name_radii(records: &[TokenRecord<DimensionValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| record.value.to_px(),
        |record| {
            NameRequest::new(
                format!("radius-{}", radius_label(record.value.to_px())),
                raw_slug(&record.value),
            )
        },
    )
}

pub(crate) fn shadow_base_name(shadow: &ShadowValue) -> String {
    if shadow.inset {
        return "shadow-inner".to_string();
    }
    let label = bucket(
        shadow.blur.to_px(),
        &[(3.0, "sm"), (8.0, "md"), (16.0, "lg")],
        "xl",
    );
    format!("shadow-{label}")
}

fn shadow_qualifier(shadow: &ShadowValue) -> String {
    [shadow.offset_x, shadow.offset_y, shadow.blur, shadow.spread]
        .iter()
        .map(|d| number_slug(d.to_px()))
        .collect::<Vec<_>>()
        .join("-")
}

fn name_shadows(records: &[TokenRecord<ShadowValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| record.value.blur.to_px(),
        |record| NameRequest::new(shadow_base_name(&record.value), shadow_qualifier(&record.value)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementStyle, TokenType};
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

    fn page(url: &str, elements: Vec<ElementStyle>) -> PageStyles {
        PageStyles {
            url: url.to_string(),
            status: Some(200),
            elements: BTreeMap::from([("div".to_string(), elements)]),
            ..PageStyles::default()
        }
    }

    fn card() -> ElementStyle {
        element(&[
            ("border-top-style", "solid"),
            ("border-top-width", "1px"),
            ("border-bottom-style", "dashed"),
            ("border-bottom-width", "thick"),
            ("border-left-style", "none"),
            ("border-left-width", "3px"),
            ("border-top-left-radius", "8px"),
            ("border-top-right-radius", "50%"),
            ("border-bottom-left-radius", "0px"),
            ("box-shadow", "rgba(0, 0, 0, 0.1) 0px 4px 6px -1px, rgba(0, 0, 0, 0.06) 0px 2px 4px -1px"),
        ])
    }

    #[test]
    fn width_keywords_and_percent_radii_resolve() {
        assert_eq!(parse_border_width("thin"), Some(DimensionValue::px(1.0)));
        assert_eq!(parse_border_width("medium"), Some(DimensionValue::px(3.0)));
        assert_eq!(parse_border_width("0px"), None);
        assert_eq!(parse_radius("50%"), Some(DimensionValue::px(FULL_RADIUS_PX)));
        assert_eq!(parse_radius("10%"), None);
        assert_eq!(parse_radius("12px 8px"), Some(DimensionValue::px(12.0)));
        assert_eq!(parse_radius("0px"), None);
    }

    #[test]
    fn extracts_each_sub_category_with_its_type() {
        let extractor = BorderExtractor::new(BorderOptions::default()).unwrap();
        let extraction = extractor.extract(&[page("https://a.test/", vec![card()])]);

        let find = |name: &str| {
            extraction
                .tokens
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing {name} in {:?}", extraction.tokens))
        };

        let thin = find("border-width-thin");
        assert_eq!(thin.token_type, TokenType::Dimension);
        assert_eq!(thin.category, WIDTH);
        assert_eq!(find("border-width-thick").category, WIDTH);
        assert_eq!(find("border-solid").token_type, TokenType::StrokeStyle);
        assert_eq!(find("border-dashed").category, STYLE);
        assert_eq!(find("radius-md").category, RADIUS);
        assert_eq!(find("radius-full").token_type, TokenType::Dimension);
        let shadow = find("shadow-md");
        assert_eq!(shadow.token_type, TokenType::Shadow);
        assert_eq!(shadow.category, SHADOW);

        // Hidden left border contributes neither a style nor a width.
        assert!(!extraction.tokens.iter().any(|t| t.name == "border-none"));
        assert!(!extraction.tokens.iter().any(|t| t.name == "border-width-medium"));

        match &extraction.stats {
            CategoryStats::Border(stats) => {
                assert_eq!(stats.unique_values, extraction.tokens.len());
                assert_eq!(stats.width_values, 2);
                assert_eq!(stats.style_values, 2);
                assert_eq!(stats.radius_values, 2);
                assert_eq!(stats.shadow_values, 1);
            }
            other => panic!("unexpected stats {other:?}"),
        }
    }

    #[test]
    fn radius_buckets_and_collisions() {
        assert_eq!(radius_label(2.0), "sm");
        assert_eq!(radius_label(8.0), "md");
        assert_eq!(radius_label(24.0), "lg");
        assert_eq!(radius_label(FULL_RADIUS_PX), "full");

        let extractor = BorderExtractor::new(BorderOptions {
            include_shadows: false,
            ..BorderOptions::default()
        })
        .unwrap();
        let extraction = extractor.extract(&[page(
            "https://a.test/",
            vec![
                element(&[("border-top-left-radius", "24px")]),
                element(&[("border-top-left-radius", "12px")]),
            ],
        )]);
        let mut names: Vec<&str> = extraction.tokens.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["radius-lg", "radius-lg-24px"]);
    }

    #[test]
    fn inset_shadows_are_named_inner() {
        let shadow = parse_box_shadow("inset 0px 2px 4px rgba(0, 0, 0, 0.05)").unwrap();
        assert_eq!(shadow_base_name(&shadow), "shadow-inner");
        let soft = parse_box_shadow("0px 20px 25px -5px rgba(0, 0, 0, 0.1)").unwrap();
        assert_eq!(shadow_base_name(&soft), "shadow-xl");
        assert_eq!(shadow_qualifier(&soft), "0-20-25-neg-5");
    }

    #[test]
    fn width_keywords_land_in_their_own_bucket() {
        let extractor = BorderExtractor::new(BorderOptions::default()).unwrap();
        let extraction = extractor.extract(&[page(
            "https://a.test/",
            vec![
                element(&[("border-top-style", "solid"), ("border-top-width", "thin")]),
                element(&[("border-top-style", "solid"), ("border-top-width", "medium")]),
                element(&[("border-top-style", "solid"), ("border-top-width", "thick")]),
                element(&[("border-top-style", "solid"), ("border-top-width", "8px")]),
            ],
        )]);
        let mut names: Vec<&str> = extraction
            .tokens
            .iter()
            .filter(|t| t.category == WIDTH)
            .map(|t| t.name.as_str())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "border-width-heavy",
                "border-width-medium",
                "border-width-thick",
                "border-width-thin"
            ]
        );
    }

    #[test]
    fn usage_ties_keep_discovery_order_across_sub_categories() {
        let extractor = BorderExtractor::new(BorderOptions::default()).unwrap();
        let extraction = extractor.extract(&[page(
            "https://a.test/",
            vec![
                element(&[("box-shadow", "0px 1px 2px rgb(0, 0, 0)")]),
                element(&[("border-top-left-radius", "8px")]),
                element(&[("border-top-style", "solid"), ("border-top-width", "1px")]),
            ],
        )]);
        let names: Vec<&str> = extraction.tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["shadow-sm", "radius-md", "border-solid", "border-width-thin"]
        );
        assert!(extraction.tokens.iter().all(|t| t.usage_count == 1));
    }

    #[test]
    fn equal_width_and_radius_stay_separate_tokens() {
        let extractor = BorderExtractor::new(BorderOptions::default()).unwrap();
        let extraction = extractor.extract(&[page(
            "https://a.test/",
            vec![element(&[
                ("border-top-style", "solid"),
                ("border-top-width", "4px"),
                ("border-top-left-radius", "4px"),
            ])],
        )]);
        let width = extraction.tokens.iter().find(|t| t.category == WIDTH).unwrap();
        let radius = extraction.tokens.iter().find(|t| t.category == RADIUS).unwrap();
        assert_eq!(width.value, radius.value);
        assert_eq!(width.name, "border-width-thick");
        assert_eq!(radius.name, "radius-sm");
    }

    #[test]
    fn tokens_are_ordered_by_usage_across_sub_categories() {
        let extractor = BorderExtractor::new(BorderOptions::default()).unwrap();
        let pages = vec![
            page("https://a.test/1", vec![element(&[("box-shadow", "0px 1px 2px rgb(0, 0, 0)")])]),
            page(
                "https://a.test/2",
                vec![element(&[
                    ("box-shadow", "0px 1px 2px rgb(0, 0, 0)"),
                    ("border-top-style", "solid"),
                    ("border-top-width", "1px"),
                ])],
            ),
        ];
        let extraction = extractor.extract(&pages);
        assert_eq!(extraction.tokens[0].name, "shadow-sm");
        assert_eq!(extraction.tokens[0].usage_count, 2);
        assert!(extraction
            .tokens
            .windows(2)
            .all(|w| w[0].usage_count >= w[1].usage_count));
    }
}
