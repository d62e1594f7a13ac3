//! Error conversion utilities for CLI.
//!
//! Turns artifex-core's typed errors into messages with a `HINT:` line
//! where there is something the user can do.

use std::path::Path;

use anyhow::anyhow;
use artifex_core::InspectError;

/// Converts an `InspectError` raised while processing `path`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn convert_inspect_error(err: InspectError, path: &Path) -> anyhow::Error {
    match err {
        InspectError::PathTraversal { path: member } => anyhow!(
            "Security violation: '{}' contains a member escaping the extraction directory: '{}'\n\
             HINT: This archive may be malicious. It was not extracted.",
            path.display(),
            member.display()
        ),
        InspectError::ZipBomb {
            compressed,
            uncompressed,
            ratio,
        } => anyhow!(
            "Security violation: '{}' appears to be a zip bomb\n\
             Compression ratio: {}:1 ({}KB → {}MB)\n\
             HINT: Use --max-compression-ratio to allow higher ratios if legitimate.",
            path.display(),
            ratio as u64,
            compressed / 1024,
            uncompressed / 1024 / 1024
        ),
        InspectError::QuotaExceeded { resource } => anyhow!(
            "Extraction limit exceeded for '{}': {}\n\
             HINT: Use --max-files, --max-total-size, or --max-file-size to increase limits.",
            path.display(),
            resource
        ),
        InspectError::UnsupportedFormat(signature) => anyhow!(
            "Not an archive: '{}' is {}\n\
             HINT: Supported formats: zip, tar (gz, bz2, xz, zst), 7z; arj, arc, lha, ace, rar \
             and zoo need their unpacker programs installed.",
            path.display(),
            signature.title()
        ),
        InspectError::Unpacker { program, reason } => anyhow!(
            "Unpacker '{program}' failed on '{}': {reason}\n\
             HINT: Check that '{program}' is installed and on PATH.",
            path.display()
        ),
        InspectError::InvalidArchive(reason) => anyhow!(
            "Invalid archive '{}': {}\n\
             HINT: The archive may be corrupted or truncated.",
            path.display(),
            reason
        ),
        InspectError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {}", path.display(), io_err)
        }
        _ => anyhow::Error::from(err).context(format!("Error processing '{}'", path.display())),
    }
}

/// Adds path context to a core result.
pub fn add_path_context<T>(result: Result<T, InspectError>, path: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_inspect_error(e, path))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use artifex_core::signature::Signature;

    use super::*;

    #[test]
    fn test_convert_path_traversal_error() {
        let err = InspectError::PathTraversal {
            path: PathBuf::from("../../AUTOEXEC.BAT"),
        };
        let msg = format!("{:?}", convert_inspect_error(err, Path::new("evil.zip")));
        assert!(msg.contains("escaping"));
        assert!(msg.contains("evil.zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_zip_bomb_error() {
        let err = InspectError::ZipBomb {
            compressed: 1024,
            uncompressed: 1024 * 1024 * 150,
            ratio: 150.0,
        };
        let msg = format!("{:?}", convert_inspect_error(err, Path::new("bomb.zip")));
        assert!(msg.contains("zip bomb"));
        assert!(msg.contains("150:1"));
    }

    #[test]
    fn test_convert_unsupported_format() {
        let err = InspectError::UnsupportedFormat(Signature::Gif);
        let msg = format!("{:?}", convert_inspect_error(err, Path::new("logo.gif")));
        assert!(msg.contains("GIF image"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_io_error() {
        let err = InspectError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let msg = format!("{:?}", convert_inspect_error(err, Path::new("a.zip")));
        assert!(msg.contains("I/O error"));
    }
}
