//! JSON output formatter for machine-readable results.

use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use artifex_core::CategoryStats;
use artifex_core::ContentListing;
use artifex_core::Extraction;
use artifex_core::ListingOutcome;
use artifex_core::PageBundle;
use artifex_core::ReadmeOutcome;
use serde::Serialize;

use super::formatter::ClassifiedFile;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::SanitizeSummary;
use super::formatter::Status;
use crate::cli::Rendering;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ListingOutput<'a> {
    path: &'a Path,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    listing: Option<&'a ContentListing>,
    lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

impl OutputFormatter for JsonFormatter {
    fn format_classification(&self, files: &[ClassifiedFile]) -> Result<()> {
        Self::output(&JsonOutput::success("classify", files))
    }

    fn format_sanitized(&self, summary: &SanitizeSummary) -> Result<()> {
        Self::output(&JsonOutput::success("sanitize", summary))
    }

    fn format_readme(
        &self,
        path: &Path,
        outcome: &ReadmeOutcome,
        _rendering: Rendering,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct SkippedOutput<'a> {
            path: &'a Path,
            reason: String,
        }

        match outcome {
            ReadmeOutcome::Rendered(readme) => Self::output(&JsonOutput::success("readme", readme)),
            ReadmeOutcome::Skipped(reason) => Self::output(&JsonOutput::new(
                "readme",
                Status::Skipped,
                SkippedOutput {
                    path,
                    reason: reason.to_string(),
                },
            )),
        }
    }

    fn format_listing(&self, path: &Path, outcome: &ListingOutcome) -> Result<()> {
        let (status, kind) = match outcome {
            ListingOutcome::Listed(_) => (Status::Success, "listed"),
            ListingOutcome::Declared(_) => (Status::Success, "declared"),
            ListingOutcome::TooLarge => (Status::Skipped, "too_large"),
            ListingOutcome::Failed(_) => (Status::Failed, "failed"),
        };
        let data = ListingOutput {
            path,
            kind,
            listing: outcome.listing(),
            lines: outcome.lines(),
            note: outcome.note(),
        };
        Self::output(&JsonOutput::new("list", status, data))
    }

    fn format_extraction(&self, archive: &Path, extraction: &Extraction) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput<'a> {
            archive: &'a Path,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            dir: Option<PathBuf>,
            #[serde(skip_serializing_if = "Option::is_none")]
            unpacker: Option<&'a str>,
            files_extracted: usize,
            directories_created: usize,
            bytes_written: u64,
            duration_ms: u128,
            warnings: &'a [String],
        }

        let mut data = ExtractionOutput {
            archive,
            kind: "cached",
            dir: extraction.dir().map(Path::to_path_buf),
            unpacker: None,
            files_extracted: 0,
            directories_created: 0,
            bytes_written: 0,
            duration_ms: 0,
            warnings: &[],
        };
        let status = match extraction {
            Extraction::Extracted { report, .. } => {
                data.kind = "extracted";
                data.unpacker = Some(report.unpacker.as_str());
                data.files_extracted = report.files_extracted;
                data.directories_created = report.directories_created;
                data.bytes_written = report.bytes_written;
                data.duration_ms = report.duration.as_millis();
                data.warnings = &report.warnings;
                Status::Success
            }
            Extraction::Cached { .. } => Status::Success,
            Extraction::TooLarge { .. } => {
                data.kind = "too_large";
                Status::Skipped
            }
        };
        Self::output(&JsonOutput::new("extract", status, data))
    }

    fn format_page(&self, page: &PageBundle) -> Result<()> {
        Self::output(&JsonOutput::success("inspect", page))
    }

    fn format_stats(&self, _dir: &Path, stats: &CategoryStats) -> Result<()> {
        Self::output(&JsonOutput::success("stats", stats))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let _ = Self::output(&JsonOutput::success("warning", WarningData { message }));
    }
}
