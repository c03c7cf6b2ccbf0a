use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dtc_lib::output::DTC_OUTPUT_VERSION;
use dtc_lib::{DtcError, DtcOutput, ErrorOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DtcOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), DtcError> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: DtcError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    let error_payload = err.to_payload();
    let payload = DtcOutput::Error(ErrorOutput {
        version: DTC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output(body: &DtcOutput, output: Option<&Path>) -> Result<(), DtcError> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content).map_err(|err| DtcError::output(path, err))?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_pretty_output(body: &DtcOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DtcOutput, colorize: bool) -> String {
    match body {
        DtcOutput::Extract(out) => {
            let mut buf = String::new();
            let header = color("[EXTRACT]", "36", colorize);
            writeln!(buf, "{} Design tokens for {}", header, out.base_url).ok();
            let failed = if out.pages_failed > 0 {
                color(&format!("{} failed", out.pages_failed), "33", colorize)
            } else {
                "0 failed".to_string()
            };
            writeln!(buf, "Pages: {} captured, {}", out.pages_captured, failed).ok();

            if !out.categories.is_empty() {
                writeln!(buf, "Categories:").ok();
            }
            for category in &out.categories {
                let kind = category.kind.to_string();
                writeln!(buf, "- {:12} {} token(s)", kind, category.token_count).ok();
                if !category.top_tokens.is_empty() {
                    writeln!(buf, "  top: {}", category.top_tokens.join(", ")).ok();
                }
                if let Some(file) = &category.file {
                    writeln!(buf, "  file: {}", file.display()).ok();
                }
            }

            let failures = out
                .categories
                .first()
                .map(|c| c.stats.pages().failed_pages.as_slice())
                .unwrap_or_default();
            if !failures.is_empty() {
                writeln!(buf, "Failed pages:").ok();
                for failure in failures {
                    writeln!(buf, "- {} ({})", failure.url, failure.reason).ok();
                }
            }
            buf
        }
        DtcOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtc_lib::error::{ErrorCategory, ErrorPayload};
    use dtc_lib::extractors::{CategoryStats, ExtractorKind, PageStats, SpacingStats};
    use dtc_lib::output::{CategorySummary, ExtractOutput};
    use dtc_lib::types::PageFailure;

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            DtcError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_lists_categories_and_failures() {
        let stats = CategoryStats::Spacing(SpacingStats {
            total_values: 12,
            unique_values: 2,
            pages: PageStats {
                pages_analyzed: 2,
                pages_failed: 1,
                failed_pages: vec![PageFailure {
                    url: "https://site.test/down".into(),
                    reason: "HTTP status 500".into(),
                }],
            },
            ..SpacingStats::default()
        });
        let output = DtcOutput::Extract(ExtractOutput {
            version: DTC_OUTPUT_VERSION.to_string(),
            base_url: "https://site.test".into(),
            pages_captured: 2,
            pages_failed: 1,
            categories: vec![CategorySummary {
                kind: ExtractorKind::Spacing,
                token_count: 2,
                top_tokens: vec!["spacing-4".into(), "spacing-2".into()],
                stats,
                file: Some(PathBuf::from("output/raw/spacing-analysis.json")),
            }],
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[EXTRACT] Design tokens for https://site.test"));
        assert!(pretty.contains("Pages: 2 captured, 1 failed"));
        assert!(pretty.contains("spacing") && pretty.contains("2 token(s)"));
        assert!(pretty.contains("top: spacing-4, spacing-2"));
        assert!(pretty.contains("spacing-analysis.json"));
        assert!(pretty.contains("https://site.test/down (HTTP status 500)"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = DtcOutput::Error(ErrorOutput {
            version: DTC_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
