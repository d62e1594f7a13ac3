//! Unpackers that shell out to legacy archivers.
//!
//! ARJ, ARC, LHA, ACE, RAR and ZOO have no maintained Rust decoders, so the
//! classic command-line tools do the work. Each tool runs with the staging
//! directory as its working directory and writes there. Limits are checked
//! afterwards by walking what the tool produced.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

use crate::ArchiveLimits;
use crate::ExtractionReport;
use crate::InspectError;
use crate::Result;
use crate::security::QuotaTracker;
use crate::signature::Signature;

use super::traits::Unpacker;

/// An external archiver invocation.
#[derive(Debug, Clone)]
pub struct ExternalUnpacker {
    program: String,
    args: Vec<String>,
    extension: &'static str,
    signatures: Vec<Signature>,
}

impl ExternalUnpacker {
    /// Creates an unpacker that runs `program args.. <archive>`.
    ///
    /// Some archivers insist on their own filename extension, so the
    /// archive is offered to the program as `archive.<extension>`.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        args: &[&str],
        extension: &'static str,
        signatures: &[Signature],
    ) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|&a| a.to_string()).collect(),
            extension,
            signatures: signatures.to_vec(),
        }
    }

    /// `arj x -y`, also for ARJ self-extractors.
    #[must_use]
    pub fn arj() -> Self {
        Self::new("arj", &["x", "-y"], "arj", &[Signature::Arj, Signature::DosSfxArj])
    }

    /// `arc x`, also used for PKPAK files.
    #[must_use]
    pub fn arc() -> Self {
        Self::new("arc", &["x"], "arc", &[Signature::Arc])
    }

    /// `lha xf`, also for LHA self-extractors.
    #[must_use]
    pub fn lha() -> Self {
        Self::new("lha", &["xf"], "lzh", &[Signature::Lha, Signature::DosSfxLha])
    }

    /// `unace x -y`.
    #[must_use]
    pub fn unace() -> Self {
        Self::new("unace", &["x", "-y"], "ace", &[Signature::Ace])
    }

    /// `unrar x -y`.
    #[must_use]
    pub fn unrar() -> Self {
        Self::new("unrar", &["x", "-y"], "rar", &[Signature::Rar])
    }

    /// `zoo -extract`.
    #[must_use]
    pub fn zoo() -> Self {
        Self::new("zoo", &["-extract"], "zoo", &[Signature::Zoo])
    }

    /// The program that is run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn failure(&self, reason: impl Into<String>) -> InspectError {
        InspectError::Unpacker {
            program: self.program.clone(),
            reason: reason.into(),
        }
    }

    /// Gives the archive a name the program accepts. The returned guard
    /// must outlive the program run.
    fn offer(&self, source: &Path) -> Result<(PathBuf, Option<TempDir>)> {
        let source = fs::canonicalize(source)?;
        let named = source
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension));
        if named {
            return Ok((source, None));
        }

        let holder = TempDir::new()?;
        let alias = holder.path().join(format!("archive.{}", self.extension));
        if fs::hard_link(&source, &alias).is_err() {
            fs::copy(&source, &alias)?;
        }
        Ok((alias, Some(holder)))
    }
}

impl Unpacker for ExternalUnpacker {
    fn name(&self) -> &str {
        &self.program
    }

    fn handles(&self, signature: Signature) -> bool {
        self.signatures.contains(&signature)
    }

    fn unpack(
        &self,
        source: &Path,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> Result<ExtractionReport> {
        let started = Instant::now();
        let (archive, _holder) = self.offer(source)?;

        debug!(program = %self.program, archive = %archive.display(), "running external unpacker");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&archive)
            .current_dir(dest)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => self.failure("program not found"),
                _ => self.failure(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or_default()
                .trim();
            let reason = if detail.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {detail}", output.status)
            };
            return Err(self.failure(reason));
        }

        let mut report = tally(dest, limits, self.name())?;
        report.duration = started.elapsed();
        Ok(report)
    }
}

/// Counts what an external program wrote and enforces the limits on it.
fn tally(dest: &Path, limits: &ArchiveLimits, unpacker: &str) -> Result<ExtractionReport> {
    let mut report = ExtractionReport::new(unpacker);
    let mut quota = QuotaTracker::new();

    for entry in WalkDir::new(dest).min_depth(1) {
        let entry = entry.map_err(|e| InspectError::Walk {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            report.directories_created += 1;
        } else if file_type.is_file() {
            let size = entry.metadata().map_err(|e| InspectError::Walk {
                path: entry.path().to_path_buf(),
                reason: e.to_string(),
            })?;
            quota.record_file(size.len(), limits)?;
            report.files_extracted += 1;
            report.bytes_written += size.len();
        } else {
            // Links created by the archiver are not followed by the lister.
            report.files_skipped += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_handles() {
        assert!(ExternalUnpacker::arj().handles(Signature::DosSfxArj));
        assert!(ExternalUnpacker::lha().handles(Signature::Lha));
        assert!(!ExternalUnpacker::zoo().handles(Signature::Arc));
        assert_eq!(ExternalUnpacker::unrar().program(), "unrar");
    }

    #[test]
    fn test_missing_program() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("a.arj");
        fs::write(&source, b"\x60\xea").unwrap();
        let unpacker =
            ExternalUnpacker::new("artifex-no-such-archiver", &[], "arj", &[Signature::Arj]);

        let err = unpacker.unpack(&source, temp.path(), &ArchiveLimits::default()).unwrap_err();
        assert_eq!(err.to_string(), "artifex-no-such-archiver failed: program not found");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_status() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("a.zoo");
        fs::write(&source, b"ZOO 2.10 Archive.").unwrap();
        let unpacker = ExternalUnpacker::new("false", &[], "zoo", &[Signature::Zoo]);

        let err = unpacker.unpack(&source, temp.path(), &ArchiveLimits::default()).unwrap_err();
        assert!(matches!(err, InspectError::Unpacker { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_tally_after_success() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("payload");
        fs::write(&source, b"data").unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();
        // A shell copy stands in for an archiver that writes one file.
        let unpacker =
            ExternalUnpacker::new("sh", &["-c", "cp \"$0\" ."], "arc", &[Signature::Arc]);

        let report = unpacker.unpack(&source, &dest, &ArchiveLimits::default()).unwrap();
        assert_eq!(report.unpacker, "sh");
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.bytes_written, 4);
        assert!(dest.join("archive.arc").is_file());
    }
}
