//! Input records supplied by the data layer.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

/// Operating system or medium an artifact was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// MS-DOS software.
    Dos,
    /// Microsoft Windows software.
    Windows,
    /// Amiga text, always ISO-8859-1.
    TextAmiga,
    /// Plain text documents.
    Text,
    /// ANSI art.
    Ansi,
    /// HTML and other markup.
    Markup,
    /// PDF documents.
    Pdf,
    /// Music and sound.
    Audio,
    /// Still images.
    Image,
    /// Video.
    Video,
    /// Linux software.
    Linux,
    /// Classic or modern Macintosh software.
    Mac,
    /// Java applets and programs.
    Java,
    /// Any tag not listed above.
    #[default]
    Other,
}

impl Platform {
    /// Parses a platform tag; unknown tags map to [`Platform::Other`].
    ///
    /// ```
    /// use artifex_core::Platform;
    ///
    /// assert_eq!(Platform::from_tag("DOS"), Platform::Dos);
    /// assert_eq!(Platform::from_tag("textamiga"), Platform::TextAmiga);
    /// assert_eq!(Platform::from_tag("netbsd"), Platform::Other);
    /// ```
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "dos" | "msdos" => Self::Dos,
            "windows" | "win" => Self::Windows,
            "textamiga" => Self::TextAmiga,
            "text" => Self::Text,
            "ansi" => Self::Ansi,
            "markup" | "html" => Self::Markup,
            "pdf" => Self::Pdf,
            "audio" => Self::Audio,
            "image" => Self::Image,
            "video" => Self::Video,
            "linux" => Self::Linux,
            "mac" | "mac10" => Self::Mac,
            "java" => Self::Java,
            _ => Self::Other,
        }
    }

    /// The canonical tag string.
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Dos => "dos",
            Self::Windows => "windows",
            Self::TextAmiga => "textamiga",
            Self::Text => "text",
            Self::Ansi => "ansi",
            Self::Markup => "markup",
            Self::Pdf => "pdf",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Video => "video",
            Self::Linux => "linux",
            Self::Mac => "mac",
            Self::Java => "java",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One artifact as recorded by the data layer.
///
/// The pipeline only reads it.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSource {
    /// Original filename as published, e.g. `RAZOR.ZIP`.
    pub filename: String,
    /// Platform the artifact targets.
    pub platform_tag: Platform,
    /// Opaque name of the stored download.
    pub id: String,
    /// Bytes already held in memory.
    pub raw_bytes: Option<Vec<u8>>,
    /// Explicit location of the download, overriding `<download>/<id>`.
    pub path: Option<PathBuf>,
    /// Member names recorded when the artifact was uploaded.
    pub declared_listing: Vec<String>,
    /// The record says there is no readme worth showing.
    pub no_readme: bool,
}

impl ArtifactSource {
    /// Creates a record for the stored download `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Sets the platform.
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform_tag = platform;
        self
    }

    /// Supplies the artifact bytes directly.
    #[must_use]
    pub fn with_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.raw_bytes = Some(bytes.into());
        self
    }

    /// Points at the download explicitly.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the declared listing from newline-delimited text.
    ///
    /// Blank lines are dropped and `\r\n` endings are accepted.
    #[must_use]
    pub fn with_declared_listing(mut self, listing: &str) -> Self {
        self.declared_listing = listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        self
    }

    /// Sets the record's no-readme flag.
    #[must_use]
    pub const fn with_no_readme(mut self, no_readme: bool) -> Self {
        self.no_readme = no_readme;
        self
    }

    /// Lower-cased filename extension without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(self.filename.trim())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Where the stored download lives, if it can be located at all.
    #[must_use]
    pub fn download_path(&self, dirs: &Dirs) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        let id = self.id.trim();
        if id.is_empty() || id.contains(['/', '\\']) || id == ".." {
            return None;
        }
        Some(dirs.download.join(id))
    }
}

/// Deployment directories the pipeline reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dirs {
    /// Stored downloads, named by artifact id.
    pub download: PathBuf,
    /// Preview images, `<id>.<ext>`.
    pub preview: PathBuf,
    /// Thumbnails, `<id>.<ext>`.
    pub thumbnail: PathBuf,
    /// Previously extracted readme copies, `<id>.txt`.
    pub extra: PathBuf,
}

impl Dirs {
    /// Lays the four directories out under one root using their
    /// conventional names.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            download: root.join("download"),
            preview: root.join("preview"),
            thumbnail: root.join("thumbnail"),
            extra: root.join("extra"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip_tags() {
        for tag in ["dos", "windows", "textamiga", "markup", "pdf", "audio"] {
            assert_eq!(Platform::from_tag(tag).as_tag(), tag);
        }
        assert_eq!(Platform::from_tag("  Dos "), Platform::Dos);
    }

    #[test]
    fn test_declared_listing_parsing() {
        let source =
            ArtifactSource::new("id", "x.zip").with_declared_listing("A.EXE\r\n\r\nREADME.TXT\n");
        assert_eq!(source.declared_listing, vec!["A.EXE", "README.TXT"]);
    }

    #[test]
    fn test_extension() {
        assert_eq!(ArtifactSource::new("id", "RAZOR.ZIP").extension().as_deref(), Some("zip"));
        assert_eq!(ArtifactSource::new("id", "README").extension(), None);
    }

    #[test]
    fn test_download_path() {
        let dirs = Dirs::under(Path::new("/srv"));
        let source = ArtifactSource::new("abc-123", "a.zip");
        assert_eq!(source.download_path(&dirs), Some(PathBuf::from("/srv/download/abc-123")));

        let explicit = source.clone().with_path("/tmp/a.zip");
        assert_eq!(explicit.download_path(&dirs), Some(PathBuf::from("/tmp/a.zip")));

        assert_eq!(ArtifactSource::new("", "a.zip").download_path(&dirs), None);
        assert_eq!(ArtifactSource::new("../x", "a.zip").download_path(&dirs), None);
    }
}
