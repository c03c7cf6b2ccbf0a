//! Raw capture payloads and their conversion into [`PageStyles`].

use std::collections::{BTreeMap, HashMap};

use crate::types::{ElementStyle, PageStyles};

/// Successful capture script output.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScriptResultWithStyles {
    pub status: String,
    pub http_status: Option<u16>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub elements: HashMap<String, Vec<RawElement>>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawElement {
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub styles: HashMap<String, String>,
}

/// Converts script output for `requested_url` into page styles.
///
/// The requested URL is kept even when the browser followed a redirect so
/// source URLs line up with the crawl result.
pub(crate) fn convert_raw_styles(
    requested_url: &str,
    raw: ScriptResultWithStyles,
    max_elements_per_selector: usize,
) -> PageStyles {
    let elements: BTreeMap<String, Vec<ElementStyle>> = raw
        .elements
        .into_iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(selector, list)| {
            let converted = list
                .into_iter()
                .take(max_elements_per_selector)
                .map(|element| ElementStyle {
                    id: element.id.filter(|id| !id.is_empty()),
                    classes: element.classes,
                    styles: element
                        .styles
                        .into_iter()
                        .filter(|(_, value)| !value.trim().is_empty())
                        .collect(),
                })
                .collect();
            (selector, converted)
        })
        .collect();

    if let Some(final_url) = raw.url.as_deref() {
        if final_url != requested_url {
            tracing::debug!(requested = requested_url, final_url, "page redirected");
        }
    }

    PageStyles {
        url: requested_url.to_string(),
        title: raw.title.filter(|t| !t.is_empty()),
        status: raw.http_status,
        error: None,
        elements,
    }
}
