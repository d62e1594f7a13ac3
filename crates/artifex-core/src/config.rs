//! Inspection configuration.

use std::path::PathBuf;

/// Safety limits applied by the built-in archive unpackers.
///
/// # Examples
///
/// ```
/// use artifex_core::ArchiveLimits;
///
/// let limits = ArchiveLimits {
///     max_file_count: 500,
///     ..Default::default()
/// };
/// assert_eq!(limits.max_file_size, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveLimits {
    /// Maximum number of members that can be extracted.
    pub max_file_count: usize,

    /// Maximum size for a single member in bytes.
    pub max_file_size: u64,

    /// Maximum total size for all members in bytes.
    pub max_total_size: u64,

    /// Maximum compression ratio allowed (uncompressed / compressed).
    pub max_compression_ratio: f64,
}

impl Default for ArchiveLimits {
    /// Default values:
    /// - `max_file_count`: 10,000
    /// - `max_file_size`: 50 MiB
    /// - `max_total_size`: 500 MiB
    /// - `max_compression_ratio`: 100.0
    fn default() -> Self {
        Self {
            max_file_count: 10_000,
            max_file_size: 50 * 1024 * 1024,
            max_total_size: 500 * 1024 * 1024,
            max_compression_ratio: 100.0,
        }
    }
}

/// Settings for the whole inspection pipeline.
///
/// Pass by reference; cloning copies the scratch path.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectConfig {
    /// Artifacts larger than this are never decompressed.
    pub max_source_size: u64,

    /// Bytes read when sniffing a file's signature, at most
    /// [`crate::signature::SAMPLE_SIZE`].
    pub sample_size: usize,

    /// Extracted files larger than this are listed without a signature.
    pub sniff_max_file_size: u64,

    /// Entries rendered before a listing is truncated.
    pub max_listed_entries: usize,

    /// Directory holding the extraction cache.
    pub scratch_root: PathBuf,

    /// Limits for the built-in unpackers.
    pub limits: ArchiveLimits,
}

impl Default for InspectConfig {
    /// Default values:
    /// - `max_source_size`: 150 MB
    /// - `sample_size`: 512
    /// - `sniff_max_file_size`: 100 MiB
    /// - `max_listed_entries`: 200
    /// - `scratch_root`: `<system temp dir>/artifex`
    fn default() -> Self {
        Self {
            max_source_size: 150_000_000,
            sample_size: crate::signature::SAMPLE_SIZE,
            sniff_max_file_size: 100 * 1024 * 1024,
            max_listed_entries: 200,
            scratch_root: std::env::temp_dir().join("artifex"),
            limits: ArchiveLimits::default(),
        }
    }
}

impl InspectConfig {
    /// Sets the extraction cache directory.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Sets the source size ceiling.
    #[must_use]
    pub const fn with_max_source_size(mut self, bytes: u64) -> Self {
        self.max_source_size = bytes;
        self
    }

    /// Sets how many entries a listing renders before truncating.
    #[must_use]
    pub const fn with_max_listed_entries(mut self, entries: usize) -> Self {
        self.max_listed_entries = entries;
        self
    }

    /// Replaces the unpacker limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ArchiveLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InspectConfig::default();
        assert_eq!(config.max_source_size, 150_000_000);
        assert_eq!(config.sample_size, 512);
        assert_eq!(config.max_listed_entries, 200);
        assert!(config.scratch_root.ends_with("artifex"));
        assert_eq!(config.limits, ArchiveLimits::default());
    }

    #[test]
    fn test_builder_methods() {
        let config = InspectConfig::default()
            .with_scratch_root("/srv/scratch")
            .with_max_source_size(1024)
            .with_max_listed_entries(5);
        assert_eq!(config.scratch_root, PathBuf::from("/srv/scratch"));
        assert_eq!(config.max_source_size, 1024);
        assert_eq!(config.max_listed_entries, 5);
    }

    #[test]
    fn test_default_limits() {
        let limits = ArchiveLimits::default();
        assert_eq!(limits.max_file_count, 10_000);
        assert_eq!(limits.max_total_size, 500 * 1024 * 1024);
        assert!((limits.max_compression_ratio - 100.0).abs() < f64::EPSILON);
    }
}
