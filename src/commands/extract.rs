use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use dtc_lib::output::{CategorySummary, ExtractOutput, DTC_OUTPUT_VERSION};
use dtc_lib::{
    build_extractors, parse_categories, CrawlResult, DtcError, DtcOutput, ExtractionStage,
    PlaywrightStyleSource, SnapshotStyleSource, StageOptions, StyleSource, Viewport,
};
use url::Url;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::progress::stderr_progress;
use crate::settings::{
    format_effective_config, load_config, resolve_extract_settings, ExtractFlagSources,
    ExtractOverrides,
};

/// Token names listed per category in the summary.
const TOP_TOKENS: usize = 5;

/// Run the extract command.
#[allow(clippy::too_many_arguments)]
pub async fn run_extract(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    crawl: PathBuf,
    styles_dir: Option<PathBuf>,
    categories: Option<String>,
    min_occurrences: Option<usize>,
    output_dir: Option<PathBuf>,
    viewport: Viewport,
    max_concurrent: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let flag_sources = ExtractFlagSources::from_args(raw_args);
    let overrides = ExtractOverrides {
        viewport,
        max_concurrent,
        min_occurrences,
        output_dir,
    };
    let config = match resolve_extract_settings(&overrides, config, &flag_sources) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&config, config_path.as_deref())
        );
    }

    let selected = match categories.as_deref().map(parse_categories).transpose() {
        Ok(kinds) => kinds.unwrap_or_default(),
        Err(err) => return render_error(err, format, output),
    };
    let extractors = match build_extractors(&selected, &config) {
        Ok(extractors) => extractors,
        Err(err) => return render_error(err, format, output),
    };

    let crawl_result = match load_crawl(&crawl) {
        Ok(result) => result,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        eprintln!(
            "Loaded {} crawled page(s) for {}",
            crawl_result.crawled_pages.len(),
            crawl_result.base_url
        );
    }

    let source: Arc<dyn StyleSource> = match &styles_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return render_error(
                    DtcError::Config(format!(
                        "Styles directory {} does not exist",
                        dir.display()
                    )),
                    format,
                    output,
                );
            }
            Arc::new(SnapshotStyleSource::new(dir))
        }
        None => Arc::new(PlaywrightStyleSource::new((&config.browser).into())),
    };
    let stage = ExtractionStage::new(
        source,
        StageOptions {
            max_concurrent: config.browser.max_concurrent_pages,
            max_elements_per_selector: config.browser.max_elements_per_selector,
            progress: stderr_progress(verbose),
        },
    );

    let report = stage.run(&crawl_result, extractors.into()).await;
    let written = match report.persist(&config.output.dir) {
        Ok(paths) => paths,
        Err(err) => return render_error(err, format, output),
    };

    let categories = report
        .extractions
        .iter()
        .zip(written)
        .map(|(extraction, path)| {
            CategorySummary::from_extraction(extraction, Some(path), TOP_TOKENS)
        })
        .collect();
    let body = DtcOutput::Extract(ExtractOutput {
        version: DTC_OUTPUT_VERSION.to_string(),
        base_url: report.base_url.clone(),
        pages_captured: report.pages_captured,
        pages_failed: report.pages_failed,
        categories,
    });

    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(err, format, output);
    }

    ExitCode::SUCCESS
}

/// Reads a crawl result, choosing YAML or JSON by file extension.
fn load_crawl(path: &Path) -> Result<CrawlResult, DtcError> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        DtcError::Config(format!(
            "Failed to read crawl result {}: {}",
            path.display(),
            err
        ))
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let crawl: CrawlResult = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    Url::parse(&crawl.base_url)?;
    Ok(crawl)
}
