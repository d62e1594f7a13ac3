//! 7z unpacker built on `sevenz-rust2`.

use std::cell::RefCell;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ArchiveLimits;
use crate::ExtractionReport;
use crate::InspectError;
use crate::Result;
use crate::security::QuotaTracker;
use crate::security::member_path;
use crate::signature::Signature;

use super::traits::Unpacker;

/// 7z unpacker.
///
/// `sevenz-rust2` drives extraction through a per-entry callback and only
/// accepts its own error type back, so the first typed failure is parked
/// and returned once the library unwinds.
#[derive(Debug, Default)]
pub struct SevenZipUnpacker;

fn parked(err: &InspectError) -> sevenz_rust2::Error {
    sevenz_rust2::Error::Other(err.to_string().into())
}

impl Unpacker for SevenZipUnpacker {
    fn name(&self) -> &str {
        "7z"
    }

    fn handles(&self, signature: Signature) -> bool {
        signature == Signature::SevenZip
    }

    fn unpack(
        &self,
        source: &Path,
        dest: &Path,
        limits: &ArchiveLimits,
    ) -> Result<ExtractionReport> {
        let started = Instant::now();
        let report = RefCell::new(ExtractionReport::new(self.name()));
        let quota = RefCell::new(QuotaTracker::new());
        let failure: RefCell<Option<InspectError>> = RefCell::new(None);

        let park = |err: InspectError| {
            let out = parked(&err);
            *failure.borrow_mut() = Some(err);
            out
        };

        let extract_fn = |entry: &sevenz_rust2::ArchiveEntry,
                          reader: &mut dyn Read,
                          _dest: &PathBuf|
         -> std::result::Result<bool, sevenz_rust2::Error> {
            let relative = member_path(&entry.name).map_err(park)?;
            let target = dest.join(&relative);

            if entry.is_directory() {
                fs::create_dir_all(&target)?;
                report.borrow_mut().directories_created += 1;
                return Ok(true);
            }

            quota.borrow_mut().record_file(entry.size, limits).map_err(park)?;
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = BufWriter::new(File::create(&target)?);
            let written = io::copy(reader, &mut out)?;
            out.flush()?;

            let mut report = report.borrow_mut();
            report.files_extracted += 1;
            report.bytes_written += written;
            Ok(true)
        };

        let result =
            sevenz_rust2::decompress_with_extract_fn(File::open(source)?, dest, extract_fn);
        if let Some(err) = failure.into_inner() {
            return Err(err);
        }
        result.map_err(|e| InspectError::InvalidArchive(format!("7z: {e}")))?;

        let mut report = report.into_inner();
        report.duration = started.elapsed();
        Ok(report)
    }
}
