use crate::error::ErrorPayload;
use crate::extractors::{CategoryStats, Extraction, ExtractorKind};
use crate::{DtcError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Schema version for output payloads.
pub const DTC_OUTPUT_VERSION: &str = "0.1.0";

/// Sub-directory of the output directory holding per-category token arrays.
pub const RAW_DIR: &str = "raw";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DtcOutput {
    Extract(ExtractOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub base_url: String,
    pub pages_captured: usize,
    pub pages_failed: usize,
    pub categories: Vec<CategorySummary>,
}

/// Per-category result line: counters plus where the tokens were written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub kind: ExtractorKind,
    pub token_count: usize,
    /// Most used token names, most used first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_tokens: Vec<String>,
    pub stats: CategoryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl CategorySummary {
    pub fn from_extraction(extraction: &Extraction, file: Option<PathBuf>, top: usize) -> Self {
        Self {
            kind: extraction.kind,
            token_count: extraction.tokens.len(),
            top_tokens: extraction
                .tokens
                .iter()
                .take(top)
                .map(|token| token.name.clone())
                .collect(),
            stats: extraction.stats.clone(),
            file,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

/// Path of the persisted token array for `kind` under `output_dir`.
pub fn analysis_path(output_dir: &Path, kind: ExtractorKind) -> PathBuf {
    output_dir.join(RAW_DIR).join(kind.analysis_file_name())
}

/// Writes the extraction's token array to `<output_dir>/raw/<kind>-analysis.json`.
pub fn write_analysis(output_dir: &Path, extraction: &Extraction) -> Result<PathBuf> {
    let path = analysis_path(output_dir, extraction.kind);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| DtcError::output(parent, err))?;
    }
    let content = serde_json::to_string_pretty(&extraction.tokens)?;
    fs::write(&path, content).map_err(|err| DtcError::output(&path, err))?;
    Ok(path)
}
