//! Cached archive extraction.
//!
//! Each artifact is unpacked at most once into
//! `<scratch_root>/artifact-content-<name>`. New extractions go through a
//! staging directory that is renamed into place, so a cache directory is
//! either absent or complete, and any directory found there is a cache hit.

mod atomic;
pub mod cache;

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::ExtractionReport;
use crate::InspectConfig;
use crate::InspectError;
use crate::Result;
use crate::formats::UnpackerRegistry;

use atomic::Published;
use atomic::extract_atomic;
pub use cache::cache_name;
use cache::PathLocks;
use cache::is_published;

/// Result of asking for an artifact's extracted tree.
#[derive(Debug)]
pub enum Extraction {
    /// The artifact was unpacked by this call.
    Extracted {
        /// The cache directory.
        dir: PathBuf,
        /// What the unpacker did.
        report: ExtractionReport,
    },
    /// The tree already existed; no unpacker ran.
    Cached {
        /// The cache directory.
        dir: PathBuf,
    },
    /// The source exceeds the size ceiling and was left alone.
    TooLarge {
        /// Source size in bytes.
        size: u64,
        /// The configured ceiling.
        limit: u64,
    },
}

impl Extraction {
    /// The extracted tree, unless the source was too large.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        match self {
            Self::Extracted { dir, .. } | Self::Cached { dir } => Some(dir),
            Self::TooLarge { .. } => None,
        }
    }
}

/// Unpacks artifacts into the extraction cache.
///
/// An `Extractor` is shared by all requests of a process; the per-path lock
/// table inside it keeps two requests from unpacking the same artifact at
/// once.
///
/// # Examples
///
/// ```no_run
/// use artifex_core::{Extraction, Extractor, InspectConfig};
/// use std::path::Path;
///
/// let extractor = Extractor::new(InspectConfig::default());
/// match extractor.extract(Path::new("/srv/download/3f2a9c"))? {
///     Extraction::Extracted { dir, report } => {
///         println!("{} files in {}", report.files_extracted, dir.display());
///     }
///     Extraction::Cached { dir } => println!("cached at {}", dir.display()),
///     Extraction::TooLarge { size, .. } => println!("{size} bytes is too large"),
/// }
/// # Ok::<(), artifex_core::InspectError>(())
/// ```
#[derive(Debug)]
pub struct Extractor {
    config: InspectConfig,
    registry: UnpackerRegistry,
    locks: PathLocks,
}

impl Extractor {
    /// Creates an extractor with the default unpackers.
    #[must_use]
    pub fn new(config: InspectConfig) -> Self {
        Self::with_registry(config, UnpackerRegistry::with_defaults())
    }

    /// Creates an extractor with a custom unpacker registry.
    #[must_use]
    pub fn with_registry(config: InspectConfig, registry: UnpackerRegistry) -> Self {
        Self {
            config,
            registry,
            locks: PathLocks::default(),
        }
    }

    /// The configuration this extractor runs with.
    #[must_use]
    pub const fn config(&self) -> &InspectConfig {
        &self.config
    }

    /// The unpackers this extractor chooses from.
    #[must_use]
    pub const fn registry(&self) -> &UnpackerRegistry {
        &self.registry
    }

    /// Where `source` is (or would be) cached.
    #[must_use]
    pub fn cache_dir(&self, source: &Path) -> Option<PathBuf> {
        cache_name(source).map(|name| self.config.scratch_root.join(name))
    }

    /// Extracts `source`, choosing the unpacker from its content and its own
    /// extension.
    ///
    /// # Errors
    ///
    /// See [`Extractor::extract_named`].
    pub fn extract(&self, source: &Path) -> Result<Extraction> {
        self.extract_named(source, None)
    }

    /// Extracts `source`, falling back to the extension of `filename` when
    /// the content is not recognized.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is missing, no unpacker handles it
    /// ([`InspectError::UnsupportedFormat`]), or unpacking fails. A failed
    /// extraction leaves no cache directory behind.
    pub fn extract_named(&self, source: &Path, filename: Option<&str>) -> Result<Extraction> {
        let size = fs::metadata(source)?.len();
        if size > self.config.max_source_size {
            debug!(source = %source.display(), size, "source too large to decompress");
            return Ok(Extraction::TooLarge {
                size,
                limit: self.config.max_source_size,
            });
        }

        let dir = self
            .cache_dir(source)
            .ok_or_else(|| {
                InspectError::InvalidArchive(format!("no file name in {}", source.display()))
            })?;

        let lock = self.locks.lock_for(&dir);
        let _guard = lock.lock();

        if is_published(&dir)? {
            debug!(dir = %dir.display(), "extraction cache hit");
            return Ok(Extraction::Cached { dir });
        }

        let unpacker = self.registry.select(source, filename)?;
        let published = extract_atomic(&dir, |staging| {
            unpacker.unpack(source, staging, &self.config.limits)
        })?;

        match published {
            Published::Installed(report) => {
                info!(
                    source = %source.display(),
                    unpacker = unpacker.name(),
                    files = report.files_extracted,
                    bytes = report.bytes_written,
                    elapsed = ?report.duration,
                    "extracted artifact"
                );
                Ok(Extraction::Extracted { dir, report })
            }
            Published::Lost => {
                debug!(dir = %dir.display(), "another process finished extraction first");
                Ok(Extraction::Cached { dir })
            }
        }
    }
}
