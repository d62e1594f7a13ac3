//! Listing of extracted trees and declared member names.

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

use crate::InspectConfig;
use crate::InspectError;
use crate::Platform;
use crate::Result;
use crate::signature;
use crate::signature::Signature;

use super::entry::ExtractedEntry;

/// Entries shown for a declared listing when no configuration is at hand.
pub const DEFAULT_MAX_LISTED_ENTRIES: usize = 200;

/// A capped, categorized inventory of an artifact's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentListing {
    /// Rendered entries in walk order.
    pub entries: Vec<ExtractedEntry>,
    /// Non-empty files left out after the cap was reached.
    pub more_files: usize,
    /// Zero-byte files, which are never rendered.
    pub empty_files: usize,
}

impl ContentListing {
    /// Display lines: one per entry, then the summary lines.
    ///
    /// ```
    /// use artifex_core::inspection::ContentListing;
    ///
    /// let listing = ContentListing {
    ///     entries: Vec::new(),
    ///     more_files: 300,
    ///     empty_files: 3,
    /// };
    /// assert_eq!(listing.render(), vec!["… 300 more files", "skipped 3 empty (0 B) files"]);
    /// ```
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines: Vec<String> =
            self.entries.iter().map(ExtractedEntry::display_line).collect();
        if self.more_files > 0 {
            lines.push(format!("… {} more files", self.more_files));
        }
        if self.empty_files > 0 {
            lines.push(format!("skipped {} empty (0 B) files", self.empty_files));
        }
        lines
    }

    /// Returns `true` when nothing at all was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.more_files == 0 && self.empty_files == 0
    }
}

/// Walks `dir` depth-first in lexical order and lists its regular files.
///
/// Files up to `sniff_max_file_size` get a prefix signature. After
/// `max_listed_entries` rendered entries nothing more is opened; remaining
/// non-empty files are only counted. Unreadable entries are skipped.
///
/// # Errors
///
/// Returns [`InspectError::Walk`] when `dir` itself cannot be read.
pub fn list_dir(dir: &Path, platform: Platform, config: &InspectConfig) -> Result<ContentListing> {
    let mut listing = ContentListing::default();

    for item in WalkDir::new(dir).sort_by_file_name() {
        let item = match item {
            Ok(item) => item,
            Err(err) if err.depth() == 0 => {
                return Err(InspectError::Walk {
                    path: dir.to_path_buf(),
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !item.file_type().is_file() {
            continue;
        }

        let size = match item.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(path = %item.path().display(), error = %err, "cannot stat entry");
                continue;
            }
        };
        if size == 0 {
            listing.empty_files += 1;
            continue;
        }
        if listing.entries.len() >= config.max_listed_entries {
            listing.more_files += 1;
            continue;
        }

        let relative = item.path().strip_prefix(dir).unwrap_or_else(|_| item.path()).to_path_buf();
        let signature = if size <= config.sniff_max_file_size {
            match sniff(item.path(), config.sample_size) {
                Ok(sig) => Some(sig),
                Err(err) => {
                    warn!(path = %item.path().display(), error = %err, "cannot sniff entry");
                    None
                }
            }
        } else {
            None
        };
        listing.entries.push(ExtractedEntry::new(relative, Some(size), signature, platform));
    }

    debug!(
        dir = %dir.display(),
        listed = listing.entries.len(),
        more = listing.more_files,
        empty = listing.empty_files,
        "listed extracted tree"
    );
    Ok(listing)
}

/// Lists member names recorded for the artifact, classifying them by
/// extension only.
///
/// Directory names (ending in `/` or `\`) are dropped.
#[must_use]
pub fn list_declared(names: &[String], platform: Platform) -> ContentListing {
    list_declared_capped(names, platform, DEFAULT_MAX_LISTED_ENTRIES)
}

pub(crate) fn list_declared_capped(
    names: &[String],
    platform: Platform,
    cap: usize,
) -> ContentListing {
    let mut listing = ContentListing::default();
    for name in names.iter().map(|n| n.trim()) {
        if name.is_empty() || name.ends_with(['/', '\\']) {
            continue;
        }
        if listing.entries.len() >= cap {
            listing.more_files += 1;
            continue;
        }
        let path = PathBuf::from(name);
        let signature = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Signature::from_extension)
            .filter(|sig| *sig != Signature::Unknown);
        listing.entries.push(ExtractedEntry::new(path, None, signature, platform));
    }
    listing
}

fn sniff(path: &Path, sample_size: usize) -> io::Result<Signature> {
    signature::classify_reader(File::open(path)?.take(sample_size as u64))
}
