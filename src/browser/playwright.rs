//! Playwright capture script, error mapping and availability checks.

use crate::{DtcError, Result};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Navigates to a page and prints the computed styles of matched elements.
///
/// Arguments: url, width, height, navigation timeout (ms), idle timeout (ms),
/// headless flag, JSON request `{selectors, properties, maxElements}`.
pub(crate) const STYLE_CAPTURE_SCRIPT: &str = r#"
const [, url, width, height, navTimeout, idleTimeout, headlessFlag, requestJson] = process.argv;

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    const request = JSON.parse(requestJson);
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
    const context = await browser.newContext({
      viewport: {
        width: parseInt(width, 10),
        height: parseInt(height, 10)
      }
    });
    const page = await context.newPage();
    const navMs = parseInt(navTimeout, 10);
    const idleMs = parseInt(idleTimeout, 10);

    const response = await page.goto(url, { waitUntil: 'load', timeout: navMs });
    const status = response ? response.status() : null;
    try {
      await page.waitForLoadState('networkidle', { timeout: idleMs });
    } catch (_) {
      // Pages with long-polling never go idle; styles are already computed.
    }

    const capture = await page.evaluate(({ selectors, properties, maxElements }) => {
      const elements = {};
      for (const selector of selectors) {
        let matched;
        try {
          matched = Array.from(document.querySelectorAll(selector)).slice(0, maxElements);
        } catch (_) {
          continue;
        }
        if (matched.length === 0) continue;
        elements[selector] = matched.map((el) => {
          const computed = window.getComputedStyle(el);
          const styles = {};
          for (const property of properties) {
            const value = computed.getPropertyValue(property);
            if (value) styles[property] = value;
          }
          return {
            id: el.id || null,
            classes: Array.from(el.classList),
            styles
          };
        });
      }
      return { title: document.title, elements };
    }, request);

    console.log(JSON.stringify({
      status: 'ok',
      httpStatus: status,
      url: page.url(),
      title: capture.title,
      elements: capture.elements
    }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

const MISSING_PLAYWRIGHT: &str =
    "Playwright npm package is missing; install with `npm install playwright`.";

/// Error result printed by the capture script on stderr.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> DtcError {
    if err.kind() == io::ErrorKind::NotFound {
        DtcError::browser(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        DtcError::Io(err)
    }
}

/// Maps Playwright stderr output to a browser error with a usable hint.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> DtcError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr.trim()) {
        return map_playwright_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return DtcError::browser(MISSING_PLAYWRIGHT);
    }

    if lower.contains("timeout") {
        return DtcError::browser(
            "Playwright timed out; increase [browser] navigation_timeout or process_timeout, and ensure the page finishes loading.",
        );
    }

    DtcError::browser(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

pub(crate) fn map_playwright_status_error(status: &str, message: String) -> DtcError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        DtcError::browser(MISSING_PLAYWRIGHT)
    } else if lower.contains("timeout") {
        DtcError::browser(format!(
            "Playwright error (status {}): {}. Hint: increase [browser] navigation_timeout or process_timeout.",
            status, message
        ))
    } else {
        DtcError::browser(format!("Playwright error (status {}): {}", status, message))
    }
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            DtcError::browser(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(DtcError::browser(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package can be required.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            DtcError::browser(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_playwright_error_detects_missing_module() {
        let err = map_playwright_error(
            "1",
            r#"{"status":"error","message":"Cannot find module 'playwright'"}"#,
        );
        match err {
            DtcError::Browser(msg) => {
                assert!(
                    msg.contains("Playwright npm package is missing"),
                    "expected missing playwright hint, got: {msg}"
                );
            }
            other => panic!("expected browser error, got {other:?}"),
        }
    }

    #[test]
    fn map_playwright_error_handles_plain_stderr_missing_module() {
        let err = map_playwright_error(
            "exit status: 1",
            "Error: Cannot find module 'playwright'\n    at Module._resolveFilename",
        );
        let msg = err.to_string();
        assert!(
            msg.contains("npm install playwright"),
            "expected npm install hint, got: {msg}"
        );
    }

    #[test]
    fn map_playwright_error_includes_timeout_hint() {
        let err = map_playwright_error(
            "exit status: 1",
            r#"{"status":"error","message":"page.goto: Timeout 30000ms exceeded."}"#,
        );
        let msg = err.to_string();
        assert!(msg.contains("Timeout 30000ms"), "got: {msg}");
        assert!(msg.contains("navigation_timeout"), "expected config hint, got: {msg}");
    }

    #[test]
    fn map_playwright_error_keeps_unrecognized_stderr() {
        let err = map_playwright_error("exit status: 3", "  segfault in renderer \n");
        let msg = err.to_string();
        assert!(msg.contains("exit status: 3"));
        assert!(msg.ends_with("segfault in renderer"));
    }

    #[test]
    fn spawn_not_found_mentions_path() {
        let err = map_spawn_error(io::Error::from(io::ErrorKind::NotFound), "nodejs");
        let msg = err.to_string();
        assert!(msg.contains("'nodejs' was not found on PATH"));
        assert!(err.to_payload().remediation.unwrap_or_default().contains("Node.js"));
    }

    #[tokio::test]
    async fn ensure_node_available_fails_for_missing_binary() {
        let result = ensure_node_available("definitely-not-a-binary").await;
        assert!(matches!(result, Err(DtcError::Browser(_))));
    }

    #[tokio::test]
    async fn ensure_playwright_available_fails_for_missing_binary() {
        let result = ensure_playwright_available("definitely-not-a-binary").await;
        assert!(result.is_err());
    }
}
