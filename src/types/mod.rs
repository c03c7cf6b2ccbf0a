//! Core data types shared by converters, extractors and the stage driver.
//!
//! - [`values`] typed token values and their canonical keys
//! - [`token`] the `ExtractedToken` output unit
//! - [`crawl`] crawl results and per-page computed-style records

pub mod crawl;
pub mod token;
pub mod values;

pub use crawl::{CrawlResult, CrawledPage, ElementStyle, PageFailure, PageStyles};
pub use token::{ExtractedToken, TokenType, TokenValue};
pub use values::{
    format_number, CanonicalKey, ColorSpace, ColorValue, CubicBezierValue, DimensionUnit,
    DimensionValue, DurationUnit, DurationValue, FontFamily, FontWeight, ShadowValue,
    StrokeStyleValue, TransitionValue, TypographyValue, ROOT_FONT_SIZE_PX,
};
