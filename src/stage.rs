//! Extraction stage driver: crawl result in, per-category tokens out.
//!
//! The stage skips pages the crawl already knows are unusable, captures the
//! rest through a [`StyleSource`] with bounded concurrency, then runs every
//! requested extractor over the same captured pages.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};
use url::Url;

use crate::browser::{CaptureRequest, StyleSource};
use crate::extractors::{run_extractors, Extraction, Extractor, ExtractorKind};
use crate::output::write_analysis;
use crate::types::{CrawlResult, PageStyles};
use crate::Result;

pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

fn log_progress(progress: &Option<ProgressCallback>, message: &str) {
    if let Some(cb) = progress {
        cb(message);
    }
}

#[derive(Clone)]
pub struct StageOptions {
    /// Pages captured at once (minimum 1).
    pub max_concurrent: usize,
    pub max_elements_per_selector: usize,
    pub progress: Option<ProgressCallback>,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            max_elements_per_selector: 50,
            progress: None,
        }
    }
}

impl std::fmt::Debug for StageOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageOptions")
            .field("max_concurrent", &self.max_concurrent)
            .field("max_elements_per_selector", &self.max_elements_per_selector)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Result of one stage run.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub base_url: String,
    /// One entry per requested extractor, in extractor order.
    pub extractions: Vec<Extraction>,
    pub pages_captured: usize,
    pub pages_failed: usize,
    output_overrides: Vec<(ExtractorKind, PathBuf)>,
}

impl StageReport {
    /// Writes `raw/<category>-analysis.json` for every extraction.
    ///
    /// Extractors configured with their own output directory write there
    /// instead of `output_dir`. Calling this again rewrites the same files.
    pub fn persist(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.extractions.len());
        for extraction in &self.extractions {
            let dir = self
                .output_overrides
                .iter()
                .find(|(kind, _)| *kind == extraction.kind)
                .map(|(_, dir)| dir.as_path())
                .unwrap_or(output_dir);
            let path = write_analysis(dir, extraction)?;
            debug!(category = %extraction.kind, path = %path.display(), "persisted tokens");
            written.push(path);
        }
        Ok(written)
    }

    pub fn extraction(&self, kind: ExtractorKind) -> Option<&Extraction> {
        self.extractions.iter().find(|e| e.kind == kind)
    }
}

pub struct ExtractionStage {
    source: Arc<dyn StyleSource>,
    options: StageOptions,
}

impl ExtractionStage {
    pub fn new(source: Arc<dyn StyleSource>, options: StageOptions) -> Self {
        Self { source, options }
    }

    /// Extractors run on the blocking thread pool once every capture is done.
    pub async fn run(
        &self,
        crawl: &CrawlResult,
        extractors: Arc<[Box<dyn Extractor>]>,
    ) -> StageReport {
        let started = Instant::now();
        let request =
            CaptureRequest::for_extractors(&extractors, self.options.max_elements_per_selector);
        let pages = self.capture_pages(crawl, &request).await;

        let pages_failed = pages.iter().filter(|p| p.is_failed()).count();
        let pages_captured = pages.len() - pages_failed;
        log_progress(
            &self.options.progress,
            &format!(
                "Captured {} page(s), {} failed; running {} extractor(s)\u{2026}",
                pages_captured,
                pages_failed,
                extractors.len()
            ),
        );

        let output_overrides = extractors
            .iter()
            .filter_map(|e| e.output_dir().map(|dir| (e.kind(), dir.to_path_buf())))
            .collect();
        let extractions = task::spawn_blocking(move || run_extractors(&extractors, &pages))
            .await
            .unwrap_or_else(|err| panic::resume_unwind(err.into_panic()));

        info!(
            base_url = %crawl.base_url,
            pages_captured,
            pages_failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "extraction stage finished"
        );

        StageReport {
            base_url: crawl.base_url.clone(),
            extractions,
            pages_captured,
            pages_failed,
            output_overrides,
        }
    }

    /// Captures every crawled page, returning results in crawl order.
    ///
    /// Never fails: skipped pages and capture errors become failed pages.
    async fn capture_pages(&self, crawl: &CrawlResult, request: &CaptureRequest) -> Vec<PageStyles> {
        let mut seen = HashSet::new();
        let mut pages: Vec<Option<PageStyles>> = Vec::with_capacity(crawl.crawled_pages.len());
        let mut pending = Vec::new();

        for page in &crawl.crawled_pages {
            if !seen.insert(page.url.as_str()) {
                debug!(url = %page.url, "duplicate crawled page ignored");
                continue;
            }
            if let Err(err) = Url::parse(&page.url) {
                pages.push(Some(PageStyles::failed(
                    &page.url,
                    format!("invalid URL: {}", err),
                )));
                continue;
            }
            if let Some(reason) = page.skip_reason() {
                debug!(url = %page.url, %reason, "page skipped");
                pages.push(Some(PageStyles::failed(&page.url, reason)));
                continue;
            }
            pending.push((pages.len(), page.url.as_str()));
            pages.push(None);
        }

        let total = pending.len();
        let concurrency = self.options.max_concurrent.max(1);
        let progress = &self.options.progress;
        let source = &self.source;

        let captured: Vec<(usize, PageStyles)> = stream::iter(pending)
            .map(|(slot, url)| async move {
                log_progress(progress, &format!("Capturing {}\u{2026}", url));
                let page = match source.capture(url, request).await {
                    Ok(page) => page,
                    Err(err) => {
                        warn!(url, error = %err, "style capture failed");
                        PageStyles::failed(url, err.to_string())
                    }
                };
                (slot, page)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        debug!(captured = captured.len(), total, "captures complete");
        for (slot, page) in captured {
            pages[slot] = Some(page);
        }
        pages.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extractors::{build_extractors, CategoryStats, ColorStats};
    use crate::types::{CrawledPage, ElementStyle};
    use crate::DtcError;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Serves a fixed body color; fails for URLs containing "down".
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl StyleSource for FakeSource {
        fn capture<'a>(
            &'a self,
            url: &'a str,
            _request: &'a CaptureRequest,
        ) -> BoxFuture<'a, Result<PageStyles>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.requested.lock().unwrap().push(url.to_string());
                if url.contains("down") {
                    return Err(DtcError::browser("Playwright timed out after 60s"));
                }
                let mut element = ElementStyle::default();
                element
                    .styles
                    .insert("color".into(), "rgb(17, 24, 39)".into());
                element.styles.insert("margin-top".into(), "8px".into());
                let mut page = PageStyles {
                    url: url.to_string(),
                    status: Some(200),
                    ..PageStyles::default()
                };
                page.elements.insert("body".into(), vec![element]);
                Ok(page)
            })
        }
    }

    /// Blocks its thread for a while before returning an empty result.
    struct SlowExtractor;

    impl Extractor for SlowExtractor {
        fn kind(&self) -> ExtractorKind {
            ExtractorKind::Color
        }

        fn selectors(&self) -> Vec<&'static str> {
            vec!["body"]
        }

        fn properties(&self) -> Vec<&'static str> {
            vec!["color"]
        }

        fn extract(&self, _pages: &[PageStyles]) -> Extraction {
            std::thread::sleep(Duration::from_millis(200));
            Extraction {
                kind: ExtractorKind::Color,
                tokens: Vec::new(),
                stats: CategoryStats::Color(ColorStats::default()),
            }
        }
    }

    fn crawled(url: &str, status: u16, content_type: &str) -> CrawledPage {
        CrawledPage {
            url: url.to_string(),
            title: None,
            status: Some(status),
            content_type: Some(content_type.to_string()),
        }
    }

    fn crawl() -> CrawlResult {
        CrawlResult {
            base_url: "https://site.test".to_string(),
            crawled_pages: vec![
                crawled("https://site.test/", 200, "text/html"),
                crawled("https://site.test/a", 200, "text/html; charset=utf-8"),
                crawled("https://site.test/a", 200, "text/html"),
                crawled("https://site.test/missing", 404, "text/html"),
                crawled("https://site.test/logo.svg", 200, "image/svg+xml"),
                crawled("https://site.test/down", 200, "text/html"),
                crawled("not a url", 200, "text/html"),
            ],
            timestamp: None,
        }
    }

    fn stage(source: Arc<FakeSource>, progress: Option<ProgressCallback>) -> ExtractionStage {
        ExtractionStage::new(
            source,
            StageOptions {
                max_concurrent: 2,
                progress,
                ..StageOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn skips_unusable_pages_and_records_failures() {
        let source = Arc::new(FakeSource::default());
        let extractors = build_extractors(&[], &Config::default()).unwrap();
        let report = stage(source.clone(), None).run(&crawl(), extractors.into()).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        let mut requested = source.requested.lock().unwrap().clone();
        requested.sort();
        assert_eq!(
            requested,
            vec!["https://site.test/", "https://site.test/a", "https://site.test/down"]
        );
        assert_eq!(report.pages_captured, 2);
        assert_eq!(report.pages_failed, 4);
        assert_eq!(report.base_url, "https://site.test");
        assert_eq!(report.extractions.len(), 5);

        let color = report.extraction(ExtractorKind::Color).unwrap();
        let stats = color.stats.pages();
        assert_eq!(stats.pages_analyzed, 2);
        assert_eq!(stats.pages_failed, 4);
        let reasons: Vec<&str> = stats.failed_pages.iter().map(|f| f.reason.as_str()).collect();
        assert!(reasons.contains(&"HTTP status 404"));
        assert!(reasons.iter().any(|r| r.contains("timed out")));
        assert!(reasons.iter().any(|r| r.starts_with("invalid URL")));

        assert_eq!(color.tokens.len(), 1);
        assert_eq!(color.tokens[0].usage_count, 2);
    }

    #[tokio::test]
    async fn reports_progress() {
        let messages = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = messages.clone();
        let progress: ProgressCallback = Arc::new(move |msg: &str| {
            sink.lock().unwrap().push(msg.to_string());
        });
        let extractors = build_extractors(&[ExtractorKind::Spacing], &Config::default()).unwrap();
        stage(Arc::new(FakeSource::default()), Some(progress))
            .run(&crawl(), extractors.into())
            .await;

        let messages = messages.lock().unwrap();
        assert!(messages.iter().any(|m| m.starts_with("Capturing https://site.test/")));
        assert!(messages.iter().any(|m| m.contains("running 1 extractor(s)")));
    }

    #[tokio::test]
    async fn persist_writes_one_file_per_category() {
        let dir = tempdir().unwrap();
        let override_dir = dir.path().join("spacing-out");
        let mut config = Config::default();
        config.spacing.output_dir = Some(override_dir.clone());
        let extractors = build_extractors(
            &[ExtractorKind::Color, ExtractorKind::Spacing],
            &config,
        )
        .unwrap();
        let report = stage(Arc::new(FakeSource::default()), None)
            .run(&crawl(), extractors.into())
            .await;

        let written = report.persist(dir.path()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("raw").join("color-analysis.json"),
                override_dir.join("raw").join("spacing-analysis.json"),
            ]
        );
        for path in &written {
            assert!(path.exists());
        }

        let again = report.persist(dir.path()).unwrap();
        assert_eq!(again, written);
    }

    #[tokio::test]
    async fn empty_crawl_produces_empty_report() {
        let extractors = build_extractors(&[], &Config::default()).unwrap();
        let crawl = CrawlResult {
            base_url: "https://site.test".into(),
            crawled_pages: vec![],
            timestamp: None,
        };
        let report = stage(Arc::new(FakeSource::default()), None)
            .run(&crawl, extractors.into())
            .await;
        assert_eq!(report.pages_captured, 0);
        assert_eq!(report.pages_failed, 0);
        assert!(report.extractions.iter().all(|e| e.tokens.is_empty()));
    }

    #[tokio::test]
    async fn extractors_leave_the_runtime_thread_free() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let ticker = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let extractors: Vec<Box<dyn Extractor>> = vec![Box::new(SlowExtractor)];
        let report = stage(Arc::new(FakeSource::default()), None)
            .run(&crawl(), extractors.into())
            .await;
        ticker.abort();

        assert_eq!(report.extractions.len(), 1);
        assert!(ticks.load(Ordering::SeqCst) >= 5);
    }
}
