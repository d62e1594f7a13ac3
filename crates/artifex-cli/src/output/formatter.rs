//! Output formatter trait for CLI results.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use artifex_core::CategoryStats;
use artifex_core::Extraction;
use artifex_core::ListingOutcome;
use artifex_core::PageBundle;
use artifex_core::ReadmeOutcome;
use artifex_core::Signature;
use artifex_core::TextEncoding;
use artifex_core::signature::Category;
use artifex_core::text::AnsiCompat;
use serde::Serialize;

use crate::cli::Rendering;

/// One classified file.
#[derive(Debug, Serialize)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub size: u64,
    pub signature: Signature,
    pub category: Category,
    /// Only for text files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<TextEncoding>,
}

/// What `sanitize` did to a file.
#[derive(Debug, Serialize)]
pub struct SanitizeSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bytes_in: usize,
    pub bytes_out: usize,
    pub ansi_compatible: bool,
}

impl SanitizeSummary {
    pub fn new(
        input: &Path,
        output: &Path,
        bytes_in: usize,
        bytes_out: usize,
        compat: AnsiCompat,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            bytes_in,
            bytes_out,
            ansi_compatible: compat == AnsiCompat::Compatible,
        }
    }
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format classification results
    fn format_classification(&self, files: &[ClassifiedFile]) -> Result<()>;

    /// Format the result of cleaning a file into another file
    fn format_sanitized(&self, summary: &SanitizeSummary) -> Result<()>;

    /// Format a rendered or skipped readme
    fn format_readme(
        &self,
        path: &Path,
        outcome: &ReadmeOutcome,
        rendering: Rendering,
    ) -> Result<()>;

    /// Format a content listing
    fn format_listing(&self, path: &Path, outcome: &ListingOutcome) -> Result<()>;

    /// Format an extraction result
    fn format_extraction(&self, archive: &Path, extraction: &Extraction) -> Result<()>;

    /// Format a page bundle
    fn format_page(&self, page: &PageBundle) -> Result<()>;

    /// Format category statistics
    fn format_stats(&self, dir: &Path, stats: &CategoryStats) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Skipped,
    Failed,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn new(operation: impl Into<String>, status: Status, data: T) -> Self {
        Self {
            operation: operation.into(),
            status,
            data: Some(data),
        }
    }

    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self::new(operation, Status::Success, data)
    }
}
