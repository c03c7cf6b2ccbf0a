//! Crawl input and per-page computed-style records.
//!
//! These types describe what the external crawl and browser collaborators
//! hand to the extraction core.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Output of the crawl phase: the pages to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub base_url: String,
    #[serde(default)]
    pub crawled_pages: Vec<CrawledPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawledPage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl CrawledPage {
    /// Returns the reason this page should not be analyzed, if any.
    pub fn skip_reason(&self) -> Option<String> {
        if let Some(status) = self.status {
            if !(200..300).contains(&status) {
                return Some(format!("HTTP status {}", status));
            }
        }
        if let Some(content_type) = &self.content_type {
            let lower = content_type.to_ascii_lowercase();
            if !lower.is_empty() && !lower.contains("html") {
                return Some(format!("non-HTML content type {}", content_type));
            }
        }
        None
    }
}

/// Computed styles of a single matched element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub styles: HashMap<String, String>,
}

impl ElementStyle {
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .get(property)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Raw style data captured for one page.
///
/// A page that failed to load carries an `error` and no elements; extractors
/// count it as a failure and take zero observations from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStyles {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Selector -> matched elements, in the order they were evaluated.
    #[serde(default)]
    pub elements: BTreeMap<String, Vec<ElementStyle>>,
}

impl PageStyles {
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Reason the page produced no usable style data, if it failed.
    pub fn failure(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        match self.status {
            Some(status) if !(200..300).contains(&status) => {
                Some(format!("HTTP status {}", status))
            }
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure().is_some()
    }

    /// Elements matched by `selector`; empty when the selector was not captured.
    pub fn elements_for(&self, selector: &str) -> &[ElementStyle] {
        self.elements
            .get(selector)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A page that contributed nothing to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFailure {
    pub url: String,
    pub reason: String,
}
