use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::DtcError;
use crate::types::{ExtractedToken, PageStyles};
use crate::Result;

use super::stats::CategoryStats;
use super::{AnimationExtractor, BorderExtractor, ColorExtractor, SpacingExtractor, TypographyExtractor};

/// The token category an extractor is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    Color,
    Typography,
    Spacing,
    Border,
    Animation,
}

impl ExtractorKind {
    pub const fn all() -> [ExtractorKind; 5] {
        [
            ExtractorKind::Color,
            ExtractorKind::Typography,
            ExtractorKind::Spacing,
            ExtractorKind::Border,
            ExtractorKind::Animation,
        ]
    }

    /// File name of the persisted token array, relative to `raw/`.
    pub fn analysis_file_name(&self) -> String {
        format!("{}-analysis.json", self)
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExtractorKind::Color => "color",
                ExtractorKind::Typography => "typography",
                ExtractorKind::Spacing => "spacing",
                ExtractorKind::Border => "border",
                ExtractorKind::Animation => "animation",
            }
        )
    }
}

impl FromStr for ExtractorKind {
    type Err = DtcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colors" => Ok(ExtractorKind::Color),
            "typography" => Ok(ExtractorKind::Typography),
            "spacing" => Ok(ExtractorKind::Spacing),
            "border" | "borders" => Ok(ExtractorKind::Border),
            "animation" | "animations" => Ok(ExtractorKind::Animation),
            _ => Err(DtcError::Config(format!("Unknown category: {}", s))),
        }
    }
}

/// One category's finalized tokens and counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub kind: ExtractorKind,
    pub tokens: Vec<ExtractedToken>,
    pub stats: CategoryStats,
}

/// A category extractor: reads captured page styles, emits named tokens.
///
/// Implementations hold their validated options and no mutable state, so a
/// single instance can run on any thread.
pub trait Extractor: Send + Sync {
    fn kind(&self) -> ExtractorKind;

    /// Element selectors whose computed styles this extractor reads.
    fn selectors(&self) -> Vec<&'static str>;

    /// Computed-style properties this extractor reads.
    fn properties(&self) -> Vec<&'static str>;

    /// Per-extractor output directory override.
    fn output_dir(&self) -> Option<&Path> {
        None
    }

    fn extract(&self, pages: &[PageStyles]) -> Extraction;
}

/// Builds extractors for `selected` categories (all when empty) from config.
pub fn build_extractors(
    selected: &[ExtractorKind],
    config: &Config,
) -> Result<Vec<Box<dyn Extractor>>> {
    let desired: Vec<ExtractorKind> = if selected.is_empty() {
        ExtractorKind::all().to_vec()
    } else {
        let mut kinds = selected.to_vec();
        kinds.sort();
        kinds.dedup();
        kinds
    };

    desired
        .into_iter()
        .map(|kind| -> Result<Box<dyn Extractor>> {
            let extractor: Box<dyn Extractor> = match kind {
                ExtractorKind::Color => Box::new(ColorExtractor::new(config.color.clone())?),
                ExtractorKind::Typography => {
                    Box::new(TypographyExtractor::new(config.typography.clone())?)
                }
                ExtractorKind::Spacing => Box::new(SpacingExtractor::new(config.spacing.clone())?),
                ExtractorKind::Border => Box::new(BorderExtractor::new(config.border.clone())?),
                ExtractorKind::Animation => {
                    Box::new(AnimationExtractor::new(config.animation.clone())?)
                }
            };
            Ok(extractor)
        })
        .collect()
}

/// Parses a comma-separated category list (`"color,spacing"`).
pub fn parse_categories(list: &str) -> Result<Vec<ExtractorKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ExtractorKind::from_str)
        .collect()
}

/// Runs every extractor over the same pages in parallel.
///
/// Results come back in the order of `extractors`.
pub fn run_extractors(extractors: &[Box<dyn Extractor>], pages: &[PageStyles]) -> Vec<Extraction> {
    extractors
        .par_iter()
        .map(|extractor| {
            debug!(category = %extractor.kind(), pages = pages.len(), "running extractor");
            let extraction = extractor.extract(pages);
            info!(
                category = %extraction.kind,
                tokens = extraction.tokens.len(),
                "extraction finished"
            );
            extraction
        })
        .collect()
}
