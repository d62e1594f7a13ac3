//! Content inspection for legacy scene artifacts.
//!
//! `artifex-core` looks inside the files of a software and art archive:
//! it identifies formats from magic bytes, guesses the encoding of DOS and
//! Amiga era text, strips ANSI escapes and SAUCE trailers, unpacks archives
//! into a shared extraction cache, and lists what they contain.
//!
//! # Examples
//!
//! ```no_run
//! use artifex_core::{ArtifactSource, Dirs, Extractor, InspectConfig, Platform};
//! use artifex_core::page::build_page;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dirs = Dirs::under(Path::new("/srv/artifacts"));
//! let extractor = Extractor::new(InspectConfig::default());
//! let source = ArtifactSource::new("3f2a9c", "RAZOR.ZIP").with_platform(Platform::Dos);
//!
//! let page = build_page(&source, &dirs, &extractor)?;
//! for line in &page.content_listing {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod artifact;
pub mod config;
pub mod error;
pub mod extraction;
pub mod format;
pub mod formats;
pub mod inspection;
pub mod page;
pub mod readme;
pub mod report;
pub mod security;
pub mod signature;
pub mod stats;
pub mod text;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use artifact::ArtifactSource;
pub use artifact::Dirs;
pub use artifact::Platform;
pub use config::ArchiveLimits;
pub use config::InspectConfig;
pub use error::InspectError;
pub use error::QuotaResource;
pub use error::Result;
pub use extraction::Extraction;
pub use extraction::Extractor;
pub use format::DisplayValue;
pub use inspection::ContentListing;
pub use inspection::ListingOutcome;
pub use inspection::list_content;
pub use page::PageBundle;
pub use page::build_page;
pub use readme::Readme;
pub use readme::ReadmeOutcome;
pub use readme::SkipReason;
pub use readme::render_readme;
pub use report::ExtractionReport;
pub use signature::Category;
pub use signature::Signature;
pub use stats::CategoryStats;
pub use stats::StatsCache;
pub use text::TextEncoding;
