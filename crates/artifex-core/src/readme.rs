//! Readme rendering in both legacy encodings.
//!
//! Automatic detection on scene text is never reliable, so a legacy readme
//! is always decoded twice, as ISO-8859-1 and as CP437, and the viewer
//! picks. [`Readme::preferred`] is only the initial choice.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::ArtifactSource;
use crate::Dirs;
use crate::InspectError;
use crate::Platform;
use crate::Result;
use crate::signature;
use crate::text::AnsiCompat;
use crate::text::TextEncoding;
use crate::text::check_ansi;
use crate::text::classify_text;
use crate::text::decode_cp437;
use crate::text::decode_latin1;
use crate::text::sanitize;

const UTF8_BOM: &str = "\u{feff}";

/// Why no readme was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "platform")]
pub enum SkipReason {
    /// The record is flagged as having no readme.
    NoReadme,
    /// The platform has no inline text worth showing.
    Platform(Platform),
    /// RIPscrip remote graphics, which are not text.
    RemoteImaging,
    /// The record has no usable filename or id.
    InvalidFilename,
    /// No stored download backs the record.
    MissingDownload,
    /// The download is not a text file.
    NotText,
    /// UTF-16 or UTF-32 text.
    WideText,
    /// Escape sequences a flat text view cannot reproduce.
    IncompatibleAnsi,
    /// Nothing left after cleaning.
    Empty,
    /// The cleaned bytes are not in a supported encoding.
    UnsupportedEncoding,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReadme => f.write_str("record has no readme"),
            Self::Platform(platform) => write!(f, "{platform} artifacts have no inline text"),
            Self::RemoteImaging => f.write_str("RIPscrip graphics"),
            Self::InvalidFilename => f.write_str("invalid filename"),
            Self::MissingDownload => f.write_str("download is missing"),
            Self::NotText => f.write_str("download is not text"),
            Self::WideText => f.write_str("UTF-16 or UTF-32 text"),
            Self::IncompatibleAnsi => f.write_str("ANSI escapes cannot be shown as text"),
            Self::Empty => f.write_str("readme is empty"),
            Self::UnsupportedEncoding => f.write_str("unsupported text encoding"),
        }
    }
}

/// A readme decoded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readme {
    /// The text decoded as ISO-8859-1, or the UTF-8 text.
    pub latin1: String,
    /// The text decoded as CP437, or the UTF-8 text.
    pub cp437: String,
    /// The detected encoding.
    pub encoding: TextEncoding,
    /// Number of lines.
    pub line_count: usize,
    /// Widest line in characters.
    pub max_line_width: usize,
}

impl Readme {
    /// The rendering to show first: [`TextEncoding::Utf8`],
    /// [`TextEncoding::Latin1`] or [`TextEncoding::Cp437`].
    #[must_use]
    pub const fn preferred(&self) -> TextEncoding {
        self.encoding
    }

    /// Text of the preferred rendering.
    #[must_use]
    pub fn text(&self) -> &str {
        match self.encoding {
            TextEncoding::Cp437 => &self.cp437,
            TextEncoding::Utf8 | TextEncoding::Latin1 | TextEncoding::Unknown => &self.latin1,
        }
    }
}

/// Outcome of [`render_readme`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeOutcome {
    /// A readme to show.
    Rendered(Readme),
    /// Nothing to show, and why.
    Skipped(SkipReason),
}

impl ReadmeOutcome {
    /// The rendered readme, if any.
    #[must_use]
    pub const fn readme(&self) -> Option<&Readme> {
        match self {
            Self::Rendered(readme) => Some(readme),
            Self::Skipped(_) => None,
        }
    }
}

enum Loaded {
    Bytes(Vec<u8>),
    Skip(SkipReason),
}

/// Finds and renders the readme of `source`.
///
/// Bytes come from `source.raw_bytes`, then a previously extracted copy at
/// `<extra>/<id>.txt`, then the download itself when it is a text file.
/// Missing or unsuitable input is reported as [`ReadmeOutcome::Skipped`].
///
/// # Errors
///
/// Returns [`InspectError::Decode`] when text classified as UTF-8 fails to
/// decode, and I/O errors other than a missing file.
pub fn render_readme(source: &ArtifactSource, dirs: &Dirs) -> Result<ReadmeOutcome> {
    if source.no_readme {
        return Ok(ReadmeOutcome::Skipped(SkipReason::NoReadme));
    }
    let platform = source.platform_tag;
    if matches!(platform, Platform::Markup | Platform::Pdf) {
        return Ok(ReadmeOutcome::Skipped(SkipReason::Platform(platform)));
    }
    if source.extension().as_deref() == Some("rip") {
        return Ok(ReadmeOutcome::Skipped(SkipReason::RemoteImaging));
    }

    let raw = match load(source, dirs)? {
        Loaded::Bytes(raw) => raw,
        Loaded::Skip(reason) => {
            debug!(id = %source.id, %reason, "no readme");
            return Ok(ReadmeOutcome::Skipped(reason));
        }
    };
    render_text(&raw, platform)
}

/// Renders readme bytes already in hand.
///
/// # Errors
///
/// Returns [`InspectError::Decode`] when text classified as UTF-8 fails to
/// decode.
///
/// # Examples
///
/// ```
/// use artifex_core::Platform;
/// use artifex_core::readme::{ReadmeOutcome, render_text};
/// use artifex_core::text::TextEncoding;
///
/// let outcome = render_text(b"GREETINGS\r\n\xb0\xb1\xb2\xdb FROM THE BBS", Platform::Dos)?;
/// let ReadmeOutcome::Rendered(readme) = outcome else { panic!() };
/// assert_eq!(readme.encoding, TextEncoding::Cp437);
/// assert!(readme.cp437.contains("░▒▓█"));
/// assert_eq!(readme.line_count, 2);
/// # Ok::<(), artifex_core::InspectError>(())
/// ```
pub fn render_text(raw: &[u8], platform: Platform) -> Result<ReadmeOutcome> {
    if signature::classify_prefix(raw).is_wide_text() {
        return Ok(ReadmeOutcome::Skipped(SkipReason::WideText));
    }

    let cleaned = sanitize(raw);
    if check_ansi(raw, &cleaned) == AnsiCompat::Incompatible {
        return Ok(ReadmeOutcome::Skipped(SkipReason::IncompatibleAnsi));
    }
    if cleaned.is_empty() {
        return Ok(ReadmeOutcome::Skipped(SkipReason::Empty));
    }

    let encoding = if platform == Platform::TextAmiga {
        TextEncoding::Latin1
    } else {
        classify_text(&cleaned)
    };
    debug!(%encoding, bytes = cleaned.len(), "classified readme");

    let readme = match encoding {
        TextEncoding::Unknown => return Ok(ReadmeOutcome::Skipped(SkipReason::UnsupportedEncoding)),
        TextEncoding::Utf8 => {
            let text = String::from_utf8(cleaned).map_err(|err| InspectError::Decode {
                encoding,
                reason: err.to_string(),
            })?;
            let text = text.strip_prefix(UTF8_BOM).map(str::to_owned).unwrap_or(text);
            let line_count = text.lines().count();
            let max_line_width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            Readme {
                cp437: text.clone(),
                latin1: text,
                encoding,
                line_count,
                max_line_width,
            }
        }
        TextEncoding::Latin1 | TextEncoding::Cp437 => {
            let (line_count, max_line_width) = byte_line_stats(&cleaned);
            Readme {
                latin1: decode_latin1(&cleaned),
                cp437: decode_cp437(&cleaned),
                encoding,
                line_count,
                max_line_width,
            }
        }
    };
    Ok(ReadmeOutcome::Rendered(readme))
}

fn load(source: &ArtifactSource, dirs: &Dirs) -> Result<Loaded> {
    if let Some(bytes) = &source.raw_bytes {
        return Ok(Loaded::Bytes(bytes.clone()));
    }
    if source.filename.trim().is_empty() {
        return Ok(Loaded::Skip(SkipReason::InvalidFilename));
    }
    let Some(download) = source.download_path(dirs) else {
        return Ok(Loaded::Skip(SkipReason::InvalidFilename));
    };

    if source.path.is_none()
        && let Some(bytes) = read_if_present(&dirs.extra.join(format!("{}.txt", source.id.trim())))?
    {
        return Ok(Loaded::Bytes(bytes));
    }

    if !download.is_file() {
        return Ok(Loaded::Skip(SkipReason::MissingDownload));
    }
    // A binary header settles it without reading the whole download.
    if !signature::sniff_path(&download)?.is_text() {
        return Ok(Loaded::Skip(SkipReason::NotText));
    }
    let bytes = fs::read(&download)?;
    if signature::classify(&bytes).is_text() {
        Ok(Loaded::Bytes(bytes))
    } else {
        Ok(Loaded::Skip(SkipReason::NotText))
    }
}

fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Line count and widest line of single-byte text; one byte is one
/// character in both legacy decodings.
fn byte_line_stats(bytes: &[u8]) -> (usize, usize) {
    let mut count = 0;
    let mut widest = 0;
    for line in bytes.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        count += 1;
        widest = widest.max(line.len());
    }
    (count, widest)
}
