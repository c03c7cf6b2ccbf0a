//! Category extractors turning captured page styles into design tokens.
//!
//! - Color (text / background / border colors)
//! - Typography (heading, body and special text styles)
//! - Spacing (margins, paddings, gaps)
//! - Border (widths, styles, radii, box shadows)
//! - Animation (transitions and keyframe animations)
//!
//! Each extractor deduplicates per page, aggregates across pages, names the
//! results and reports category counters.

mod animation;
mod border;
mod color;
mod runner;
mod spacing;
mod stats;
mod typography;


pub use animation::AnimationExtractor;
pub use border::BorderExtractor;
pub use color::ColorExtractor;
pub use runner::{
    build_extractors, parse_categories, run_extractors, Extraction, Extractor, ExtractorKind,
};
pub use spacing::SpacingExtractor;
pub use stats::{
    AnimationStats, BorderStats, CategoryStats, ColorStats, PageStats, SpacingStats,
    TypographyStats,
};
pub use typography::TypographyExtractor;
