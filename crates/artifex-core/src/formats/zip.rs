//! ZIP unpacker, including PKSFX self-extractors.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::ArchiveLimits;
use crate::ExtractionReport;
use crate::InspectError;
use crate::Result;
use crate::error::QuotaResource;
use crate::security::QuotaTracker;
use crate::security::member_path;
use crate::security::validate_compression_ratio;
use crate::signature::Signature;

use super::traits::Unpacker;

/// ZIP unpacker built on the `zip` crate.
///
/// Self-extracting DOS executables carry the archive after the stub; the
/// central directory records the offset so they open like plain ZIPs.
#[derive(Debug, Default)]
pub struct ZipUnpacker;

fn invalid(err: &zip::result::ZipError) -> InspectError {
    InspectError::InvalidArchive(format!("ZIP: {err}"))
}

impl Unpacker for ZipUnpacker {
    fn name(&self) -> &str {
        "zip"
    }

    fn handles(&self, signature: Signature) -> bool {
        matches!(signature, Signature::Zip | Signature::DosSfxZip)
    }

    fn unpack(
        &self,
        source: &Path,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> Result<ExtractionReport> {
        let started = Instant::now();
        let file = File::open(source)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| invalid(&e))?;

        let mut report = ExtractionReport::new(self.name());
        let mut quota = QuotaTracker::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| invalid(&e))?;
            let relative = member_path(entry.name())?;
            let target = dest.join(&relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                report.directories_created += 1;
                continue;
            }
            if entry.is_symlink() {
                report.files_skipped += 1;
                report.add_warning(format!("skipped link {}", relative.display()));
                continue;
            }

            quota.record_file(entry.size(), limits)?;
            validate_compression_ratio(entry.compressed_size(), entry.size(), limits)?;

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = BufWriter::new(File::create(&target)?);
            // Declared sizes can lie; never write more than the limit.
            let written = io::copy(&mut (&mut entry).take(limits.max_file_size + 1), &mut out)?;
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

        report.duration = started.elapsed();
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::create_shrunk_zip;
    use crate::test_utils::create_test_zip;

    fn write_zip(dir: &Path, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
        let path = dir.join("source.zip");
        fs::write(&path, create_test_zip(entries)).unwrap();
        path
    }

    #[test]
    fn test_unpack_nested() {
        let temp = TempDir::new().unwrap();
        let source = write_zip(
            temp.path(),
            &[("README.TXT", b"hello"), ("DATA/LEVEL.DAT", b"\x01\x02")],
        );
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();

        let report = ZipUnpacker.unpack(&source, &dest, &ArchiveLimits::default()).unwrap();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.bytes_written, 7);
        assert_eq!(fs::read(dest.join("README.TXT")).unwrap(), b"hello");
        assert!(dest.join("DATA/LEVEL.DAT").is_file());
    }

    #[test]
    fn test_unpack_shrunk_member() {
        let temp = TempDir::new().unwrap();
        let text = b"Greetings from the crew, 1989!\r\n";
        let source = temp.path().join("PKZ101.ZIP");
        fs::write(&source, create_shrunk_zip("FILE_ID.DIZ", text)).unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();

        let report = ZipUnpacker.unpack(&source, &dest, &ArchiveLimits::default()).unwrap();
        assert_eq!(report.files_extracted, 1);
        assert_eq!(fs::read(dest.join("FILE_ID.DIZ")).unwrap(), text);
    }

    #[test]
    fn test_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let source = write_zip(temp.path(), &[("../evil.txt", b"x")]);
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();

        let err = ZipUnpacker.unpack(&source, &dest, &ArchiveLimits::default()).unwrap_err();
        assert!(err.is_security_violation());
        assert!(!temp.path().join("evil.txt").exists());
    }

    #[test]
    fn test_file_count_limit() {
        let temp = TempDir::new().unwrap();
        let source = write_zip(temp.path(), &[("A", b"1"), ("B", b"2"), ("C", b"3")]);
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();
        let limits = ArchiveLimits {
            max_file_count: 2,
            ..Default::default()
        };

        let err = ZipUnpacker.unpack(&source, &dest, &limits).unwrap_err();
        assert!(matches!(err, InspectError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_not_a_zip() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("bad.zip");
        fs::write(&source, b"PK\x03\x04 truncated").unwrap();
        let err = ZipUnpacker.unpack(&source, temp.path(), &ArchiveLimits::default()).unwrap_err();
        assert!(matches!(err, InspectError::InvalidArchive(_)));
    }
}
