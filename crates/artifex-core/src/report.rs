//! Extraction reporting.

use std::time::Duration;

/// Statistics gathered while unpacking one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Name of the unpacker that ran, e.g. `zip` or `arj`.
    pub unpacker: String,

    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directories created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Members that were not written (links, device nodes).
    pub files_skipped: usize,

    /// Wall time spent unpacking.
    pub duration: Duration,

    /// Non-fatal problems noticed while unpacking.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates an empty report for the named unpacker.
    #[must_use]
    pub fn new(unpacker: impl Into<String>) -> Self {
        Self {
            unpacker: unpacker.into(),
            ..Self::default()
        }
    }

    /// Notes something the unpacker left out or changed.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}
