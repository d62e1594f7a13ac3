//! Content listings for artifacts.
//!
//! An archive is extracted into the cache and its tree walked; anything
//! else falls back to the member names the data layer recorded.

mod entry;
mod list;

use tracing::debug;
use tracing::warn;

use crate::ArtifactSource;
use crate::Dirs;
use crate::Extraction;
use crate::Extractor;
use crate::InspectError;

pub use entry::ExtractedEntry;
pub use list::ContentListing;
pub use list::DEFAULT_MAX_LISTED_ENTRIES;
pub use list::list_declared;
pub use list::list_dir;

/// Note shown in place of a listing for oversized downloads.
pub const TOO_LARGE_NOTE: &str = "too large to decompress";

/// What [`list_content`] could say about an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    /// The download exceeds the size ceiling and was not opened.
    TooLarge,
    /// The archive was extracted and its tree walked.
    Listed(ContentListing),
    /// Not an extractable archive; built from the declared member names.
    Declared(ContentListing),
    /// Extraction or the walk failed; the error text is shown instead.
    Failed(String),
}

impl ListingOutcome {
    /// The listing, when there is one.
    #[must_use]
    pub const fn listing(&self) -> Option<&ContentListing> {
        match self {
            Self::Listed(listing) | Self::Declared(listing) => Some(listing),
            Self::TooLarge | Self::Failed(_) => None,
        }
    }

    /// Text shown instead of a listing.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        match self {
            Self::TooLarge => Some(TOO_LARGE_NOTE),
            Self::Failed(reason) => Some(reason),
            Self::Listed(_) | Self::Declared(_) => None,
        }
    }

    /// Display lines of the listing; empty when there is none.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.listing().map(ContentListing::render).unwrap_or_default()
    }
}

/// Lists the contents of `source`.
///
/// The download is extracted through `extractor`, which also supplies the
/// listing limits. Sources without a download on disk, and downloads no
/// unpacker recognizes, use the declared listing.
#[must_use]
pub fn list_content(source: &ArtifactSource, dirs: &Dirs, extractor: &Extractor) -> ListingOutcome {
    let config = extractor.config();
    let platform = source.platform_tag;
    let declared = || {
        ListingOutcome::Declared(list::list_declared_capped(
            &source.declared_listing,
            platform,
            config.max_listed_entries,
        ))
    };

    let Some(path) = source.download_path(dirs).filter(|p| p.is_file()) else {
        debug!(id = %source.id, "no download on disk, using declared listing");
        return declared();
    };

    match extractor.extract_named(&path, Some(&source.filename)) {
        Ok(Extraction::TooLarge { size, .. }) => {
            debug!(id = %source.id, size, "skipping listing of oversized download");
            ListingOutcome::TooLarge
        }
        Ok(extraction) => {
            let Some(dir) = extraction.dir() else {
                return ListingOutcome::TooLarge;
            };
            match list_dir(dir, platform, config) {
                Ok(listing) => ListingOutcome::Listed(listing),
                Err(err) => {
                    warn!(id = %source.id, error = %err, "listing failed");
                    ListingOutcome::Failed(err.to_string())
                }
            }
        }
        Err(InspectError::UnsupportedFormat(signature)) => {
            debug!(id = %source.id, %signature, "not an archive, using declared listing");
            declared()
        }
        Err(err) => {
            warn!(id = %source.id, error = %err, "extraction failed");
            ListingOutcome::Failed(err.to_string())
        }
    }
}
