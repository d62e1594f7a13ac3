//! The unpacker seam.

use std::path::Path;

use crate::ArchiveLimits;
use crate::ExtractionReport;
use crate::Result;
use crate::signature::Signature;

/// Something that can unpack one family of archive formats into a
/// directory.
///
/// Implementations must write only below `dest` and must leave `dest`
/// usable for cleanup on error; the caller removes it.
pub trait Unpacker: Send + Sync {
    /// Short name used in reports and logs, e.g. `zip` or `arj`.
    fn name(&self) -> &str;

    /// Returns `true` if this unpacker understands `signature`.
    fn handles(&self, signature: Signature) -> bool;

    /// Unpacks `source` into the existing, empty directory `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is damaged, a limit is exceeded, a
    /// member escapes `dest`, or the underlying tool fails.
    fn unpack(
        &self,
        source: &Path,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> Result<ExtractionReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Null;

    impl Unpacker for Null {
        fn name(&self) -> &str {
            "null"
        }

        fn handles(&self, signature: Signature) -> bool {
            signature == Signature::Zoo
        }

        fn unpack(
            &self,
            _source: &Path,
            _dest: &Path,
            _limits: &ArchiveLimits,
        ) -> Result<ExtractionReport> {
            Ok(ExtractionReport::new(self.name()))
        }
    }

    #[test]
    fn test_trait_object() {
        let unpacker: Box<dyn Unpacker> = Box::new(Null);
        assert_eq!(unpacker.name(), "null");
        assert!(unpacker.handles(Signature::Zoo));
        assert!(!unpacker.handles(Signature::Zip));
    }
}
