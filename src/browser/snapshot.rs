//! Offline style capture from a directory of saved page snapshots.
//!
//! Each page lives in `<dir>/<snapshot_file_name(url)>` and holds a
//! serialized [`PageStyles`].

use futures::future::BoxFuture;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use super::{CaptureRequest, StyleSource};
use crate::types::PageStyles;
use crate::{DtcError, Result};

/// File name of the snapshot for `url`: host and path (plus query) slugged,
/// e.g. `https://example.com/docs/intro` -> `example-com-docs-intro.json`.
pub fn snapshot_file_name(url: &str) -> String {
    let raw = match Url::parse(url) {
        Ok(parsed) => {
            let mut raw = parsed.host_str().unwrap_or_default().to_string();
            if let Some(port) = parsed.port() {
                raw.push_str(&format!("-{}", port));
            }
            raw.push_str(parsed.path());
            if let Some(query) = parsed.query() {
                raw.push('-');
                raw.push_str(query);
            }
            raw
        }
        Err(_) => url.to_string(),
    };

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "index.json".to_string()
    } else {
        format!("{}.json", slug)
    }
}

/// Reads page styles captured earlier instead of launching a browser.
#[derive(Debug, Clone)]
pub struct SnapshotStyleSource {
    dir: PathBuf,
}

impl SnapshotStyleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(snapshot_file_name(url))
    }

    async fn load(&self, url: &str, request: &CaptureRequest) -> Result<PageStyles> {
        let path = self.path_for(url);
        let contents = tokio::fs::read_to_string(&path).await.map_err(|err| {
            DtcError::browser(format!(
                "No style snapshot for {} at {}: {}",
                url,
                path.display(),
                err
            ))
        })?;
        let mut page: PageStyles = serde_json::from_str(&contents)?;
        page.url = url.to_string();
        for elements in page.elements.values_mut() {
            elements.truncate(request.max_elements_per_selector);
        }
        debug!(url, path = %path.display(), "loaded style snapshot");
        Ok(page)
    }
}

impl StyleSource for SnapshotStyleSource {
    fn capture<'a>(
        &'a self,
        url: &'a str,
        request: &'a CaptureRequest,
    ) -> BoxFuture<'a, Result<PageStyles>> {
        Box::pin(self.load(url, request))
    }
}
