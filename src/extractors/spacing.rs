use std::path::Path;

use crate::aggregate::{Observation, PageObservations, TokenAggregator, TokenRecord};
use crate::config::SpacingOptions;
use crate::convert::parse_dimension;
use crate::naming::{assign_names, number_slug, value_slug, NameRequest};
use crate::types::{DimensionValue, PageStyles};
use crate::Result;

use super::stats::{count_category, CategoryStats, PageStats, SpacingStats};
use super::{Extraction, Extractor, ExtractorKind};

pub const MARGIN: &str = "margin";
pub const PADDING: &str = "padding";
pub const GAP: &str = "gap";

const SCALE_STEP_PX: f64 = 4.0;

const SELECTORS: &[&str] = &[
    "body", "header", "nav", "main", "section", "article", "aside", "footer", "div", "h1", "h2",
    "h3", "h4", "h5", "h6", "p", "ul", "ol", "li", "button", "input", "form", "figure",
];

const MARGINS: &[&str] = &["margin-top", "margin-right", "margin-bottom", "margin-left"];
const PADDINGS: &[&str] = &[
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];
const GAPS: &[&str] = &["gap", "row-gap", "column-gap"];

/// Collects margin, padding and gap lengths onto a 4px spacing scale.
#[derive(Debug, Clone)]
pub struct SpacingExtractor {
    options: SpacingOptions,
}

impl SpacingExtractor {
    pub fn new(options: SpacingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    fn groups(&self) -> Vec<(&'static str, &'static [&'static str])> {
        let mut groups = Vec::with_capacity(3);
        if self.options.include_margins {
            groups.push((MARGIN, MARGINS));
        }
        if self.options.include_paddings {
            groups.push((PADDING, PADDINGS));
        }
        if self.options.include_gaps {
            groups.push((GAP, GAPS));
        }
        groups
    }

    fn observe(&self, page: &PageStyles) -> PageObservations<DimensionValue> {
        let groups = self.groups();
        let mut observations = PageObservations::new(page.url.as_str());
        for selector in SELECTORS {
            for element in page.elements_for(selector) {
                for (category, properties) in &groups {
                    for property in properties.iter() {
                        let Some(value) = element.style(property).and_then(parse_dimension) else {
                            continue;
                        };
                        if value.value > 0.0 {
                            observations.push(Observation::new(value, *category));
                        }
                    }
                }
            }
        }
        observations
    }
}

impl Extractor for SpacingExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Spacing
    }

    fn selectors(&self) -> Vec<&'static str> {
        SELECTORS.to_vec()
    }

    fn properties(&self) -> Vec<&'static str> {
        self.groups()
            .into_iter()
            .flat_map(|(_, properties)| properties.iter().copied())
            .collect()
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
        let tokens = aggregator.finalize(self.options.minimum_occurrences, name_spacing);

        let stats = SpacingStats {
            total_values,
            unique_values: tokens.len(),
            margin_values: count_category(&tokens, MARGIN),
            padding_values: count_category(&tokens, PADDING),
            gap_values: count_category(&tokens, GAP),
            pages: page_stats,
        };

        Extraction {
            kind: ExtractorKind::Spacing,
            tokens,
            stats: CategoryStats::Spacing(stats),
        }
    }
}

/// `spacing-{px/4}` on the 4px scale, otherwise `spacing-{raw}`.
pub(crate) fn spacing_base_name(value: &DimensionValue) -> String {
    let px = value.to_px();
    let steps = px / SCALE_STEP_PX;
    if (steps - steps.round()).abs() < 1e-9 {
        format!("spacing-{}", number_slug(steps.round()))
    } else {
        format!("spacing-{}", value_slug(value.value, value.unit.as_str()))
    }
}

fn name_spacing(records: &[TokenRecord<DimensionValue>]) -> Vec<String> {
    assign_names(
        records,
        |record| record.value.to_px(),
        |record| {
            NameRequest::new(
                spacing_base_name(&record.value),
                value_slug(record.value.value, record.value.unit.as_str()),
            )
        },
    )
}
