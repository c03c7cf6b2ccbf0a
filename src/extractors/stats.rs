//! Per-category counters reported alongside each token list.
//!
//! Every category reports its unique count as the length of the finalized
//! token list, plus the page counters shared by all categories.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{ExtractedToken, PageFailure, PageStyles};

/// Page-level counters shared by every category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub pages_analyzed: usize,
    pub pages_failed: usize,
    pub failed_pages: Vec<PageFailure>,
}

impl PageStats {
    /// Splits pages into the usable ones and recorded failures.
    pub fn partition(pages: &[PageStyles]) -> (PageStats, Vec<&PageStyles>) {
        let mut stats = PageStats::default();
        let mut usable = Vec::with_capacity(pages.len());
        for page in pages {
            match page.failure() {
                Some(reason) => {
                    warn!(url = %page.url, %reason, "skipping failed page");
                    stats.failed_pages.push(PageFailure {
                        url: page.url.clone(),
                        reason,
                    });
                }
                None => usable.push(page),
            }
        }
        stats.pages_analyzed = usable.len();
        stats.pages_failed = stats.failed_pages.len();
        (stats, usable)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStats {
    pub total_colors: usize,
    pub unique_colors: usize,
    pub text_colors: usize,
    pub background_colors: usize,
    pub border_colors: usize,
    #[serde(flatten)]
    pub pages: PageStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyStats {
    pub total_styles: usize,
    pub unique_styles: usize,
    pub heading_styles: usize,
    pub body_styles: usize,
    pub special_styles: usize,
    pub font_families: usize,
    #[serde(flatten)]
    pub pages: PageStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingStats {
    pub total_values: usize,
    pub unique_values: usize,
    pub margin_values: usize,
    pub padding_values: usize,
    pub gap_values: usize,
    #[serde(flatten)]
    pub pages: PageStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderStats {
    pub total_values: usize,
    pub unique_values: usize,
    pub width_values: usize,
    pub style_values: usize,
    pub radius_values: usize,
    pub shadow_values: usize,
    #[serde(flatten)]
    pub pages: PageStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationStats {
    pub total_values: usize,
    pub unique_values: usize,
    pub transitions: usize,
    pub animations: usize,
    /// Distinct keyframes names observed, before threshold filtering.
    pub keyframes: usize,
    #[serde(flatten)]
    pub pages: PageStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryStats {
    Color(ColorStats),
    Typography(TypographyStats),
    Spacing(SpacingStats),
    Border(BorderStats),
    Animation(AnimationStats),
}

impl CategoryStats {
    pub fn pages(&self) -> &PageStats {
        match self {
            CategoryStats::Color(s) => &s.pages,
            CategoryStats::Typography(s) => &s.pages,
            CategoryStats::Spacing(s) => &s.pages,
            CategoryStats::Border(s) => &s.pages,
            CategoryStats::Animation(s) => &s.pages,
        }
    }

    /// The category's unique-token counter.
    pub fn unique(&self) -> usize {
        match self {
            CategoryStats::Color(s) => s.unique_colors,
            CategoryStats::Typography(s) => s.unique_styles,
            CategoryStats::Spacing(s) => s.unique_values,
            CategoryStats::Border(s) => s.unique_values,
            CategoryStats::Animation(s) => s.unique_values,
        }
    }
}

/// Counts finalized tokens carrying `category`.
pub(crate) fn count_category(tokens: &[ExtractedToken], category: &str) -> usize {
    tokens.iter().filter(|t| t.category == category).count()
}
