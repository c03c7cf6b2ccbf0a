use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DtcError;
use crate::{Result, Viewport};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    pub color: ColorOptions,
    pub typography: TypographyOptions,
    pub spacing: SpacingOptions,
    pub border: BorderOptions,
    pub animation: AnimationOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    pub node_command: String,
    pub viewport: Viewport,
    pub headless: bool,
    #[serde(with = "humantime_serde")]
    pub navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub network_idle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub process_timeout: Duration,
    pub max_concurrent_pages: usize,
    pub max_elements_per_selector: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            network_idle_timeout: Duration::from_secs(10),
            process_timeout: Duration::from_secs(60),
            max_concurrent_pages: 4,
            max_elements_per_selector: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

fn check_minimum(section: &str, minimum_occurrences: usize) -> Result<()> {
    if minimum_occurrences < 1 {
        return Err(DtcError::config(format!(
            "[{section}] minimum_occurrences must be at least 1"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorOptions {
    pub include_text_colors: bool,
    pub include_background_colors: bool,
    pub include_border_colors: bool,
    pub minimum_occurrences: usize,
    pub output_dir: Option<PathBuf>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            include_text_colors: true,
            include_background_colors: true,
            include_border_colors: true,
            minimum_occurrences: 1,
            output_dir: None,
        }
    }
}

impl ColorOptions {
    pub fn validate(&self) -> Result<()> {
        check_minimum("color", self.minimum_occurrences)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypographyOptions {
    pub include_headings: bool,
    pub include_body_text: bool,
    pub include_special_text: bool,
    pub minimum_occurrences: usize,
    pub output_dir: Option<PathBuf>,
}

impl Default for TypographyOptions {
    fn default() -> Self {
        Self {
            include_headings: true,
            include_body_text: true,
            include_special_text: true,
            minimum_occurrences: 1,
            output_dir: None,
        }
    }
}

impl TypographyOptions {
    pub fn validate(&self) -> Result<()> {
        check_minimum("typography", self.minimum_occurrences)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacingOptions {
    pub include_margins: bool,
    pub include_paddings: bool,
    pub include_gaps: bool,
    pub minimum_occurrences: usize,
    pub output_dir: Option<PathBuf>,
}

impl Default for SpacingOptions {
    fn default() -> Self {
        Self {
            include_margins: true,
            include_paddings: true,
            include_gaps: true,
            minimum_occurrences: 1,
            output_dir: None,
        }
    }
}

impl SpacingOptions {
    pub fn validate(&self) -> Result<()> {
        check_minimum("spacing", self.minimum_occurrences)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderOptions {
    pub include_widths: bool,
    pub include_styles: bool,
    pub include_radii: bool,
    pub include_shadows: bool,
    pub minimum_occurrences: usize,
    pub output_dir: Option<PathBuf>,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self {
            include_widths: true,
            include_styles: true,
            include_radii: true,
            include_shadows: true,
            minimum_occurrences: 1,
            output_dir: None,
        }
    }
}

impl BorderOptions {
    pub fn validate(&self) -> Result<()> {
        check_minimum("border", self.minimum_occurrences)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationOptions {
    pub include_transitions: bool,
    pub include_animations: bool,
    pub minimum_occurrences: usize,
    pub output_dir: Option<PathBuf>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            include_transitions: true,
            include_animations: true,
            minimum_occurrences: 1,
            output_dir: None,
        }
    }
}

impl AnimationOptions {
    pub fn validate(&self) -> Result<()> {
        check_minimum("animation", self.minimum_occurrences)
    }
}

impl Config {
    /// Load config from a TOML file, central config, or return defaults.
    /// Priority: explicit path > ~/.config/dtc/config.toml > defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.is_file() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config/dtc/config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        let browser = &self.browser;
        if browser.max_concurrent_pages == 0 {
            return Err(DtcError::config(
                "[browser] max_concurrent_pages must be at least 1",
            ));
        }
        if browser.max_elements_per_selector == 0 {
            return Err(DtcError::config(
                "[browser] max_elements_per_selector must be at least 1",
            ));
        }
        for (name, timeout) in [
            ("navigation_timeout", browser.navigation_timeout),
            ("network_idle_timeout", browser.network_idle_timeout),
            ("process_timeout", browser.process_timeout),
        ] {
            if timeout.is_zero() {
                return Err(DtcError::config(format!(
                    "[browser] {name} must be greater than zero"
                )));
            }
        }
        self.color.validate()?;
        self.typography.validate()?;
        self.spacing.validate()?;
        self.border.validate()?;
        self.animation.validate()?;
        Ok(())
    }

    /// Applies one minimum occurrence threshold to every category.
    pub fn set_minimum_occurrences(&mut self, minimum_occurrences: usize) {
        self.color.minimum_occurrences = minimum_occurrences;
        self.typography.minimum_occurrences = minimum_occurrences;
        self.spacing.minimum_occurrences = minimum_occurrences;
        self.border.minimum_occurrences = minimum_occurrences;
        self.animation.minimum_occurrences = minimum_occurrences;
    }
}
