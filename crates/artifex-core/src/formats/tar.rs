//! TAR unpacker for plain and compressed tape archives.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tar::EntryType;
use tracing::debug;

use crate::ArchiveLimits;
use crate::ExtractionReport;
use crate::InspectError;
use crate::Result;
use crate::error::QuotaResource;
use crate::security::QuotaTracker;
use crate::security::member_path;
use crate::security::validate_compression_ratio;
use crate::signature::Signature;

use super::compression::CompressionCodec;
use super::traits::Unpacker;

/// TAR unpacker, optionally behind a compression codec.
///
/// Links, device nodes and FIFOs are skipped and noted in the report.
#[derive(Debug, Clone, Copy)]
pub struct TarUnpacker {
    codec: Option<CompressionCodec>,
}

impl TarUnpacker {
    /// Unpacker for uncompressed `.tar` files.
    #[must_use]
    pub const fn plain() -> Self {
        Self { codec: None }
    }

    /// Unpacker for `.tar` wrapped in `codec`.
    #[must_use]
    pub const fn compressed(codec: CompressionCodec) -> Self {
        Self { codec: Some(codec) }
    }

    fn extract_entries<R: Read>(
        &self,
        reader: R,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> Result<ExtractionReport> {
        let invalid = |e: io::Error| InspectError::InvalidArchive(format!("{}: {e}", self.name()));
        let mut archive = tar::Archive::new(reader);
        let mut report = ExtractionReport::new(self.name());
        let mut quota = QuotaTracker::new();

        for entry in archive.entries().map_err(invalid)? {
            let mut entry = entry.map_err(invalid)?;
            let name = entry.path().map_err(invalid)?.to_string_lossy().into_owned();
            let relative = member_path(&name)?;
            let target = dest.join(&relative);

            match entry.header().entry_type() {
                EntryType::Directory => {
                    fs::create_dir_all(&target)?;
                    report.directories_created += 1;
                }
                EntryType::Regular | EntryType::Continuous => {
                    let size = entry.size();
                    quota.record_file(size, limits)?;
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    let mut out = BufWriter::new(File::create(&target)?);
                    let written =
                        io::copy(&mut (&mut entry).take(limits.max_file_size + 1), &mut out)?;
                    out.flush()?;
                    if written > limits.max_file_size {
                        return Err(InspectError::QuotaExceeded {
                            resource: QuotaResource::FileSize {
                                size: written,
                                max: limits.max_file_size,
                            },
                        });
                    }
                    report.files_extracted += 1;
                    report.bytes_written += written;
                }
                other => {
                    debug!(
                        member = %relative.display(),
                        kind = ?other,
                        "skipping non-file tar member"
                    );
                    report.files_skipped += 1;
                    report.add_warning(format!("skipped {other:?} member {}", relative.display()));
                }
            }
        }

        Ok(report)
    }
}

impl Unpacker for TarUnpacker {
    fn name(&self) -> &str {
        match self.codec {
            None => "tar",
            Some(CompressionCodec::Gzip) => "tar.gz",
            Some(CompressionCodec::Bzip2) => "tar.bz2",
            Some(CompressionCodec::Xz) => "tar.xz",
            Some(CompressionCodec::Zstd) => "tar.zst",
        }
    }

    fn handles(&self, signature: Signature) -> bool {
        match self.codec {
            None => signature == Signature::Tar,
            Some(codec) => signature == codec.signature(),
        }
    }

    fn unpack(
        &self,
        source: &Path,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> Result<ExtractionReport> {
        let started = Instant::now();
        let file = File::open(source)?;
        let compressed_size = file.metadata()?.len();
        let reader = BufReader::new(file);

        let mut report = match self.codec {
            None => self.extract_entries(reader, dest, limits)?,
            Some(codec) => {
                let report = self.extract_entries(codec.decoder(reader)?, dest, limits)?;
                // Compressed tarballs only expose the ratio of the whole stream.
                validate_compression_ratio(compressed_size, report.bytes_written, limits)?;
                report
            }
        };
        report.duration = started.elapsed();
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::create_test_tar;

    #[test]
    fn test_unpack_plain_tar() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.tar");
        fs::write(
            &source,
            create_test_tar(&[("docs/file.txt", b"hello"), ("top.txt", b"x")]),
        )
        .unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();

        let report = TarUnpacker::plain()
            .unpack(&source, &dest, &ArchiveLimits::default())
            .unwrap();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(fs::read(dest.join("docs/file.txt")).unwrap(), b"hello");
    }

    #[test]
    fn test_unpack_gzip_tar() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.tgz");
        let tar = create_test_tar(&[("readme.txt", b"compressed text")]);
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&tar).unwrap();
        fs::write(&source, encoder.finish().unwrap()).unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();

        let unpacker = TarUnpacker::compressed(CompressionCodec::Gzip);
        assert!(unpacker.handles(Signature::Gzip));
        assert_eq!(unpacker.name(), "tar.gz");
        let report = unpacker.unpack(&source, &dest, &ArchiveLimits::default()).unwrap();
        assert_eq!(report.files_extracted, 1);
        assert_eq!(fs::read_to_string(dest.join("readme.txt")).unwrap(), "compressed text");
    }

    #[test]
    fn test_total_size_limit() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.tar");
        fs::write(&source, create_test_tar(&[("a", &[b'a'; 600]), ("b", &[b'b'; 600])])).unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();
        let limits = ArchiveLimits {
            max_total_size: 1000,
            ..Default::default()
        };

        let err = TarUnpacker::plain().unpack(&source, &dest, &limits).unwrap_err();
        assert!(matches!(err, InspectError::QuotaExceeded { .. }));
    }
}
