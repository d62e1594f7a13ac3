//! Compression ratio check.

use crate::ArchiveLimits;
use crate::InspectError;
use crate::Result;

/// Rejects members whose uncompressed size is implausibly large for their
/// compressed size.
///
/// # Errors
///
/// Returns [`InspectError::ZipBomb`] when the ratio exceeds the limit.
pub fn validate_compression_ratio(
    compressed_size: u64,
    uncompressed_size: u64,
    limits: &ArchiveLimits,
) -> Result<()> {
    if compressed_size == 0 {
        return Ok(());
    }

    let ratio = uncompressed_size as f64 / compressed_size as f64;
    if ratio > limits.max_compression_ratio {
        return Err(InspectError::ZipBomb {
            compressed: compressed_size,
            uncompressed: uncompressed_size,
            ratio,
        });
    }

    Ok(())
}
