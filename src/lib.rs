//! Design Token Crawler (DTC) Library
//!
//! Turns the computed CSS styles of crawled pages into normalized design
//! tokens: colors, typography, spacing, borders and animations, each with a
//! semantic name, a usage count and the pages it was seen on.
//!
//! # Module Overview
//!
//! - [`convert`] - CSS value parsers (colors, lengths, durations, easings, shorthands)
//! - [`extractors`] - per-category extractors and the parallel runner
//! - [`aggregate`] - cross-page deduplication and usage counting
//! - [`naming`] - deterministic semantic names
//! - [`browser`] - style capture (Playwright or saved snapshots)
//! - [`stage`] - crawl result in, persisted token files out
//! - [`config`] - configuration file support
//! - [`types`] - token and crawl data types
//! - [`output`] - JSON output schemas and token persistence
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use dtc_lib::{build_extractors, Config, CrawlResult, ExtractionStage, SnapshotStyleSource, StageOptions};
//!
//! # async fn example(crawl: CrawlResult) -> dtc_lib::Result<()> {
//! let config = Config::default();
//! let extractors = build_extractors(&[], &config)?;
//! let stage = ExtractionStage::new(
//!     Arc::new(SnapshotStyleSource::new("styles")),
//!     StageOptions::default(),
//! );
//! let report = stage.run(&crawl, extractors.into()).await;
//! report.persist(Path::new("output"))?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod browser;
pub mod config;
pub mod convert;
pub mod error;
pub mod extractors;
pub mod naming;
pub mod output;
pub mod stage;
pub mod types;
pub mod viewport;

pub use browser::{
    BrowserOptions, CaptureRequest, PlaywrightStyleSource, SnapshotStyleSource, StyleSource,
};
pub use config::Config;
pub use error::{DtcError, Result};
pub use extractors::{
    build_extractors, parse_categories, run_extractors, AnimationExtractor, BorderExtractor,
    CategoryStats, ColorExtractor, Extraction, Extractor, ExtractorKind, SpacingExtractor,
    TypographyExtractor,
};
pub use output::{
    CategorySummary, DtcOutput, ErrorOutput, ExtractOutput, DTC_OUTPUT_VERSION,
};
pub use stage::{ExtractionStage, ProgressCallback, StageOptions, StageReport};
pub use types::{
    CrawlResult, CrawledPage, ElementStyle, ExtractedToken, PageStyles, TokenType, TokenValue,
};
pub use viewport::Viewport;
