//! Extraction cache naming and per-path locking.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

/// Prefix of every cache directory under the scratch root.
pub const CACHE_PREFIX: &str = "artifact-content-";

/// Cache directory name for `source`: the prefix plus the lower-cased,
/// trimmed base filename.
///
/// Returns `None` when the path has no usable file name.
///
/// ```
/// use artifex_core::extraction::cache_name;
/// use std::path::Path;
///
/// assert_eq!(
///     cache_name(Path::new("/srv/download/ABC-123 ")).as_deref(),
///     Some("artifact-content-abc-123")
/// );
/// ```
#[must_use]
pub fn cache_name(source: &Path) -> Option<String> {
    let base = source.file_name()?.to_str()?.trim().to_lowercase();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(format!("{CACHE_PREFIX}{base}"))
}

/// Returns `true` if a finished extraction lives at `dir`.
///
/// Trees only appear through an atomic rename, so any directory there is
/// complete, including the empty tree of an archive without members.
pub(crate) fn is_published(dir: &Path) -> io::Result<bool> {
    match fs::metadata(dir) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// One mutex per cache path, so concurrent requests for the same artifact
/// unpack it once.
#[derive(Debug, Default)]
pub(crate) struct PathLocks {
    table: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    /// Returns the lock for `path`, creating it on first use.
    ///
    /// Locks nobody else holds are dropped from the table on the way.
    pub(crate) fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut table = self.table.lock();
        table.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(table.entry(path.to_path_buf()).or_default())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.lock().len()
    }
}
