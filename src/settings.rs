use std::path::{Path, PathBuf};

use dtc_lib::{Config, DtcError, Viewport};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct ExtractFlagSources {
    pub viewport: bool,
    pub max_concurrent: bool,
}

impl ExtractFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            viewport: flag_present(args, "--viewport"),
            max_concurrent: flag_present(args, "--max-concurrent"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// CLI values for settings that can also come from the config file.
#[derive(Debug, Clone)]
pub struct ExtractOverrides {
    pub viewport: Viewport,
    pub max_concurrent: usize,
    pub min_occurrences: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// Merge CLI arguments into the config, preferring CLI when flags are present.
///
/// The returned config is re-validated so a CLI value can't slip past the
/// checks the config file goes through.
pub fn resolve_extract_settings(
    overrides: &ExtractOverrides,
    mut config: Config,
    flags: &ExtractFlagSources,
) -> Result<Config, DtcError> {
    if flags.viewport {
        config.browser.viewport = overrides.viewport;
    }
    if flags.max_concurrent {
        config.browser.max_concurrent_pages = overrides.max_concurrent;
    }
    if let Some(min) = overrides.min_occurrences {
        config.set_minimum_occurrences(min);
    }
    if let Some(dir) = &overrides.output_dir {
        config.output.dir = dir.clone();
    }
    config
        .validate()
        .map_err(|e| DtcError::Config(format!("Invalid option: {}", e)))?;
    Ok(config)
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/dtc/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DtcError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        DtcError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DtcError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let browser = &config.browser;
    format!(
        "Effective config [{source}]: viewport={}, max-concurrent={}, max-elements={}, timeouts: nav={}s, network-idle={}s, process={}s, output={}, min-occurrences: color={}, typography={}, spacing={}, border={}, animation={}",
        browser.viewport,
        browser.max_concurrent_pages,
        browser.max_elements_per_selector,
        browser.navigation_timeout.as_secs(),
        browser.network_idle_timeout.as_secs(),
        browser.process_timeout.as_secs(),
        config.output.dir.display(),
        config.color.minimum_occurrences,
        config.typography.minimum_occurrences,
        config.spacing.minimum_occurrences,
        config.border.minimum_occurrences,
        config.animation.minimum_occurrences,
    )
}
