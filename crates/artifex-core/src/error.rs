//! Error types for artifact inspection.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::signature::Signature;
use crate::text::TextEncoding;

/// Result type alias using `InspectError`.
pub type Result<T> = std::result::Result<T, InspectError>;

/// The archive limit an unpacker ran into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Too many members.
    FileCount {
        /// Members seen so far, including the rejected one.
        current: usize,
        /// Configured limit.
        max: usize,
    },
    /// The members add up to too many bytes.
    TotalSize {
        /// Bytes counted so far, including the rejected member.
        current: u64,
        /// Configured limit.
        max: u64,
    },
    /// One member is too large on its own.
    FileSize {
        /// Declared or written size of the member.
        size: u64,
        /// Configured limit.
        max: u64,
    },
    /// Size accounting overflowed `u64`.
    IntegerOverflow,
}

impl fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "archive holds more than {max} files (reached {current})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "archive unpacks to more than {max} bytes (reached {current})")
            }
            Self::FileSize { size, max } => {
                write!(f, "member of {size} bytes exceeds the {max} byte limit")
            }
            Self::IntegerOverflow => f.write_str("member sizes overflow"),
        }
    }
}

/// Errors that can occur while inspecting or unpacking an artifact.
#[derive(Error, Debug)]
pub enum InspectError {
    /// Reading or writing the filesystem failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No unpacker handles this kind of file.
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(Signature),

    /// The archive is damaged or truncated.
    #[error("damaged archive: {0}")]
    InvalidArchive(String),

    /// An archive member name escapes the extraction directory.
    #[error("path traversal in member {path}")]
    PathTraversal {
        /// The offending member name.
        path: PathBuf,
    },

    /// A member expands far more than real data does.
    #[error(
        "member expands {ratio:.0}:1 ({compressed} to {uncompressed} bytes), likely a zip bomb"
    )]
    ZipBomb {
        /// Stored size.
        compressed: u64,
        /// Expanded size.
        uncompressed: u64,
        /// `uncompressed / compressed`.
        ratio: f64,
    },

    /// An archive limit was reached.
    #[error("{resource}")]
    QuotaExceeded {
        /// Which limit.
        resource: QuotaResource,
    },

    /// An external unpacker program failed or could not be started.
    #[error("{program} failed: {reason}")]
    Unpacker {
        /// Program name, e.g. `arj`.
        program: String,
        /// Exit status or spawn failure text.
        reason: String,
    },

    /// The directory walk over an extracted tree failed.
    #[error("cannot walk {path}: {reason}")]
    Walk {
        /// Root of the walk.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Text that was classified as an encoding failed to decode as it.
    #[error("{encoding} text failed to decode: {reason}")]
    Decode {
        /// The encoding the text was classified as.
        encoding: TextEncoding,
        /// Decoder failure.
        reason: String,
    },
}

impl InspectError {
    /// Returns `true` for errors raised by the archive guards rather than
    /// by damaged input or the environment.
    ///
    /// ```
    /// use artifex_core::InspectError;
    /// use std::path::PathBuf;
    ///
    /// let escape = InspectError::PathTraversal {
    ///     path: PathBuf::from("..\\AUTOEXEC.BAT"),
    /// };
    /// assert!(escape.is_security_violation());
    /// assert!(!InspectError::InvalidArchive("bad CRC".into()).is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::ZipBomb { .. } | Self::QuotaExceeded { .. }
        )
    }

    /// Free-form detail carried by the error.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(detail) => Some(detail),
            Self::Unpacker { reason, .. }
            | Self::Walk { reason, .. }
            | Self::Decode { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The limit that was reached, for quota errors.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        if let Self::QuotaExceeded { resource } = self {
            Some(resource)
        } else {
            None
        }
    }
}
