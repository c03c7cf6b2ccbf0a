//! Style capture for crawled pages.
//!
//! The extraction core never talks to a browser directly; it asks a
//! [`StyleSource`] for the computed styles of a page.
//!
//! # Module Structure
//!
//! - [`manager`] - Playwright-backed capture with concurrency control
//! - [`playwright`] - capture script and availability checks
//! - [`styles`] - conversion of raw script output into [`PageStyles`]
//! - [`snapshot`] - offline capture from a directory of saved pages
//!
//! # Example
//!
//! ```no_run
//! use dtc_lib::browser::{CaptureRequest, PlaywrightStyleSource, StyleSource};
//! use dtc_lib::config::BrowserConfig;
//!
//! # async fn example() -> dtc_lib::Result<()> {
//! let source = PlaywrightStyleSource::new((&BrowserConfig::default()).into());
//! let request = CaptureRequest::new(vec!["h1".into()], vec!["color".into()], 10);
//! let page = source.capture("https://example.com", &request).await?;
//! println!("captured {} selectors", page.elements.len());
//! # Ok(())
//! # }
//! ```

mod manager;
mod playwright;
mod snapshot;
mod styles;

use futures::future::BoxFuture;
use std::collections::BTreeSet;

use crate::extractors::Extractor;
use crate::types::PageStyles;
use crate::Result;

pub use manager::{
    BrowserOptions, PlaywrightStyleSource, DEFAULT_NAVIGATION_TIMEOUT,
    DEFAULT_NETWORK_IDLE_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
};
pub use snapshot::{snapshot_file_name, SnapshotStyleSource};

/// What to read from each page: selectors, computed properties and a cap on
/// matched elements per selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub selectors: Vec<String>,
    pub properties: Vec<String>,
    pub max_elements_per_selector: usize,
}

impl CaptureRequest {
    pub fn new(
        selectors: Vec<String>,
        properties: Vec<String>,
        max_elements_per_selector: usize,
    ) -> Self {
        Self {
            selectors,
            properties,
            max_elements_per_selector: max_elements_per_selector.max(1),
        }
    }

    /// Union of the selectors and properties the given extractors read.
    pub fn for_extractors(
        extractors: &[Box<dyn Extractor>],
        max_elements_per_selector: usize,
    ) -> Self {
        let mut selectors = BTreeSet::new();
        let mut properties = BTreeSet::new();
        for extractor in extractors {
            selectors.extend(extractor.selectors());
            properties.extend(extractor.properties());
        }
        Self::new(
            selectors.into_iter().map(str::to_string).collect(),
            properties.into_iter().map(str::to_string).collect(),
            max_elements_per_selector,
        )
    }
}

/// Source of computed styles for a single page.
///
/// A page that loads but returns an error status is reported through
/// [`PageStyles::status`]; `Err` is reserved for capture failures (browser
/// missing, timeout, malformed output).
pub trait StyleSource: Send + Sync {
    fn capture<'a>(
        &'a self,
        url: &'a str,
        request: &'a CaptureRequest,
    ) -> BoxFuture<'a, Result<PageStyles>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extractors::{build_extractors, ExtractorKind};

    #[test]
    fn capture_request_unions_extractor_needs() {
        let extractors = build_extractors(
            &[ExtractorKind::Color, ExtractorKind::Spacing],
            &Config::default(),
        )
        .unwrap();
        let request = CaptureRequest::for_extractors(&extractors, 25);

        assert_eq!(request.max_elements_per_selector, 25);
        assert!(request.properties.contains(&"color".to_string()));
        assert!(request.properties.contains(&"padding-top".to_string()));
        assert!(request.selectors.contains(&"body".to_string()));

        let mut sorted = request.selectors.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, request.selectors);
    }

    #[test]
    fn capture_request_never_caps_at_zero() {
        let request = CaptureRequest::new(vec![], vec![], 0);
        assert_eq!(request.max_elements_per_selector, 1);
    }
}
