//! Atomic publication of an extracted tree.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::InspectError;
use crate::Result;

use super::cache::is_published;

/// How a staged extraction ended up.
#[derive(Debug)]
pub(crate) enum Published<T> {
    /// The staging directory now lives at the destination.
    Installed(T),
    /// Another process published the destination first.
    Lost,
}

/// Runs `unpack` against a private staging directory next to `dest` and
/// renames the result into place.
///
/// On failure only the staging directory is removed and the error is
/// returned. Readers never see a half-written `dest`.
///
/// The caller must have checked that nothing is published at `dest` yet.
pub(crate) fn extract_atomic<T, F>(dest: &Path, unpack: F) -> Result<Published<T>>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let parent = dest
        .parent()
        .ok_or_else(|| InspectError::InvalidArchive(format!("no parent for {}", dest.display())))?;
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new().prefix(".staging-").tempdir_in(parent)?;
    let value = match unpack(staging.path()) {
        Ok(value) => value,
        // `staging` is removed when dropped.
        Err(err) => return Err(err),
    };

    let staged = staging.keep();
    match fs::rename(&staged, dest) {
        Ok(()) => Ok(Published::Installed(value)),
        Err(err) => {
            discard(&staged);
            if is_published(dest)? {
                Ok(Published::Lost)
            } else {
                Err(err.into())
            }
        }
    }
}

fn discard(dir: &Path) {
    if let Err(err) = fs::remove_dir_all(dir) {
        warn!(dir = %dir.display(), error = %err, "failed to remove staging directory");
    }
}
