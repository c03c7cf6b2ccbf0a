use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum DtcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to write output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DtcError {
    pub fn browser(message: impl Into<String>) -> Self {
        DtcError::Browser(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        DtcError::Config(message.into())
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DtcError::Output {
            path: path.into(),
            source,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DtcError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DtcError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the crawl result URLs (e.g., https://example.com/about).",
            ),
            DtcError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check the crawl result / style snapshot JSON; run with --verbose for details.",
            ),
            DtcError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check the crawl result YAML syntax.",
            ),
            DtcError::Toml(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check the config file; unknown options are rejected.",
            ),
            DtcError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("playwright npm package is missing") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("not found on path") || lower.contains("node command") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH, or pass --styles-dir to use captured snapshots.",
                    )
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Increase the [browser] timeouts in the config file or lower --max-concurrent.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Re-run with --verbose to see per-page capture logs.",
                    )
                }
            }
            DtcError::Output { path, source } => ErrorPayload::new(
                ErrorCategory::Output,
                format!("Failed to write {}: {}", path.display(), source),
                "Check that --output-dir is writable; extraction results can be persisted again without re-crawling.",
            ),
            DtcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("minimum_occurrences") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set minimum_occurrences (or --min-occurrences) to 1 or greater.",
                    )
                } else if lower.contains("unknown category") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a comma-separated subset of: color,typography,spacing,border,animation.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths (e.g., --crawl crawl.json) and the config file.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DtcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Browser,
    Output,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_payload_includes_playwright_remediation() {
        let err = DtcError::browser(
            "Playwright npm package is missing; install with `npm install playwright`.",
        );
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Browser);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("npm install playwright"),
            "expected remediation to mention npm install playwright, got: {remediation}"
        );
    }

    #[test]
    fn browser_payload_includes_node_hint() {
        let err = DtcError::browser(
            "Unable to spawn Playwright helper; 'node' was not found on PATH",
        );
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("--styles-dir"),
            "expected snapshot fallback hint, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = DtcError::config("Some other config issue");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn config_payload_explains_minimum_occurrences() {
        let err = DtcError::config("color.minimum_occurrences must be at least 1");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("--min-occurrences"));
    }

    #[test]
    fn output_payload_mentions_retry() {
        let err = DtcError::output(
            "out/raw/color-analysis.json",
            std::io::Error::other("read-only file system"),
        );
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Output);
        assert!(payload.message.contains("color-analysis.json"));
        assert!(payload
            .remediation
            .unwrap_or_default()
            .contains("without re-crawling"));
    }
}
