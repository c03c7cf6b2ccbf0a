//! Playwright-backed style capture with semaphore-based concurrency limits.

use crate::config::BrowserConfig;
use crate::types::PageStyles;
use crate::{DtcError, Result, Viewport};
use futures::future::BoxFuture;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::{OnceCell, Semaphore};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::playwright::{
    ensure_node_available, ensure_playwright_available, map_playwright_error,
    map_playwright_status_error, map_spawn_error, ScriptError, STYLE_CAPTURE_SCRIPT,
};
use super::styles::{convert_raw_styles, ScriptResultWithStyles};
use super::{CaptureRequest, StyleSource};

/// Default timeout for page navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for waiting for network idle state.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for the entire Playwright process.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration options for browser sessions.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// The Node.js command to use (default: "node").
    pub node_command: String,
    pub viewport: Viewport,
    pub headless: bool,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
    /// Timeout for the entire Playwright process.
    pub process_timeout: Duration,
    /// Maximum number of pages captured at once.
    pub max_concurrent_sessions: usize,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            max_concurrent_sessions: 1,
        }
    }
}

impl From<&BrowserConfig> for BrowserOptions {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            node_command: config.node_command.clone(),
            viewport: config.viewport,
            headless: config.headless,
            navigation_timeout: config.navigation_timeout,
            network_idle_timeout: config.network_idle_timeout,
            process_timeout: config.process_timeout,
            max_concurrent_sessions: config.max_concurrent_pages,
        }
    }
}

/// Captures computed styles by running a Playwright script per page.
#[derive(Debug, Clone)]
pub struct PlaywrightStyleSource {
    options: BrowserOptions,
    semaphore: Arc<Semaphore>,
    available: Arc<OnceCell<()>>,
}

impl PlaywrightStyleSource {
    pub fn new(options: BrowserOptions) -> Self {
        let permits = options.max_concurrent_sessions.max(1);
        Self {
            options,
            semaphore: Arc::new(Semaphore::new(permits)),
            available: Arc::new(OnceCell::new()),
        }
    }

    /// Checks node and Playwright once per source; later captures reuse the result.
    async fn ensure_available(&self) -> Result<()> {
        self.available
            .get_or_try_init(|| async {
                ensure_node_available(&self.options.node_command).await?;
                ensure_playwright_available(&self.options.node_command).await
            })
            .await
            .map(|_| ())
    }

    async fn capture_page(&self, url: &str, request: &CaptureRequest) -> Result<PageStyles> {
        self.ensure_available().await?;
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DtcError::browser("Style capture unavailable"))?;

        let request_json = serde_json::json!({
            "selectors": request.selectors,
            "properties": request.properties,
            "maxElements": request.max_elements_per_selector,
        })
        .to_string();

        let mut cmd = Command::new(&self.options.node_command);
        cmd.arg("-e")
            .arg(STYLE_CAPTURE_SCRIPT)
            .arg(url)
            .arg(self.options.viewport.width.to_string())
            .arg(self.options.viewport.height.to_string())
            .arg(self.options.navigation_timeout.as_millis().to_string())
            .arg(self.options.network_idle_timeout.as_millis().to_string())
            .arg(if self.options.headless { "1" } else { "0" })
            .arg(request_json)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(url, viewport = %self.options.viewport, "launching style capture");
        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &self.options.node_command))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout_pipe {
                let _ = out.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = match timeout(self.options.process_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(DtcError::Io(err)),
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                warn!(url, timeout = ?self.options.process_timeout, "style capture killed");
                return Err(DtcError::browser(format!(
                    "Playwright timed out after {:?}",
                    self.options.process_timeout
                )));
            }
        };

        let stdout = stdout_task.await.unwrap_or_else(|_| Vec::new());
        let stderr = stderr_task.await.unwrap_or_else(|_| Vec::new());

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(map_playwright_error(status.to_string(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        let result: ScriptResultWithStyles = serde_json::from_str(stdout.trim()).map_err(|e| {
            DtcError::browser(format!(
                "Failed to parse Playwright output: {} - raw: {}",
                e,
                stdout.trim()
            ))
        })?;

        if result.status != "ok" {
            if let Ok(err) = serde_json::from_str::<ScriptError>(stdout.trim()) {
                return Err(map_playwright_status_error(&err.status, err.message));
            }
            return Err(DtcError::browser(format!(
                "Playwright returned non-ok status: {}",
                result.status
            )));
        }

        let page = convert_raw_styles(url, result, request.max_elements_per_selector);
        debug!(
            url,
            selectors = page.elements.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "style capture finished"
        );
        Ok(page)
    }
}

impl StyleSource for PlaywrightStyleSource {
    fn capture<'a>(
        &'a self,
        url: &'a str,
        request: &'a CaptureRequest,
    ) -> BoxFuture<'a, Result<PageStyles>> {
        Box::pin(self.capture_page(url, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_options_default_values() {
        let opts = BrowserOptions::default();
        assert_eq!(opts.node_command, "node");
        assert!(opts.headless);
        assert_eq!(opts.max_concurrent_sessions, 1);
        assert_eq!(opts.viewport, Viewport::default());
        assert_eq!(opts.navigation_timeout, DEFAULT_NAVIGATION_TIMEOUT);
        assert_eq!(opts.network_idle_timeout, DEFAULT_NETWORK_IDLE_TIMEOUT);
        assert_eq!(opts.process_timeout, DEFAULT_PROCESS_TIMEOUT);
    }

    #[test]
    fn browser_options_follow_config() {
        let config = BrowserConfig {
            node_command: "custom-node".to_string(),
            viewport: Viewport {
                width: 1920,
                height: 1080,
            },
            headless: false,
            max_concurrent_pages: 8,
            ..BrowserConfig::default()
        };
        let opts = BrowserOptions::from(&config);
        assert_eq!(opts.node_command, "custom-node");
        assert!(!opts.headless);
        assert_eq!(opts.viewport.width, 1920);
        assert_eq!(opts.max_concurrent_sessions, 8);
        assert_eq!(opts.process_timeout, config.process_timeout);
    }

    #[test]
    fn semaphore_never_zero() {
        let source = PlaywrightStyleSource::new(BrowserOptions {
            max_concurrent_sessions: 0,
            ..BrowserOptions::default()
        });

        assert_eq!(source.semaphore.available_permits(), 1);
    }

    #[tokio::test]
    async fn capture_fails_for_missing_node() {
        let source = PlaywrightStyleSource::new(BrowserOptions {
            node_command: "definitely-not-a-binary".to_string(),
            ..BrowserOptions::default()
        });
        let request = CaptureRequest::new(vec!["p".into()], vec!["color".into()], 5);

        let result = source.capture("https://example.com", &request).await;
        match result {
            Err(DtcError::Browser(msg)) => assert!(msg.contains("not found on PATH"), "{msg}"),
            other => panic!("expected browser error, got {other:?}"),
        }
    }
}
