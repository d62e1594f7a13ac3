//! File signature classification from raw bytes.
//!
//! Artifacts in the collection are stored under opaque names and their
//! original filename extensions are frequently wrong, so the true format is
//! read from the bytes themselves. Classification is total: every sample,
//! including an empty one, maps to exactly one [`Signature`].
//!
//! Two modes exist:
//!
//! - [`classify`] inspects the whole buffer, which is needed for formats
//!   identified deep inside a file (ISO 9660 volumes, tracker modules,
//!   self-extracting archive stubs) and for text checks that must see every
//!   byte.
//! - [`classify_prefix`] inspects at most [`SAMPLE_SIZE`] bytes and is used
//!   when sniffing thousands of archive members.
//!
//! Legacy matchers in [`magic`] always run before the generic text/binary
//! sniff in [`sniff`].
//!
//! # Examples
//!
//! ```
//! use artifex_core::signature::{Category, Signature, classify};
//!
//! let sig = classify(b"\x60\xea\x29\x00\x1e\x06\x01\x00");
//! assert_eq!(sig, Signature::Arj);
//! assert_eq!(sig.category(), Category::Archive);
//! ```

mod magic;
mod sniff;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

/// Number of leading bytes read in prefix mode.
pub const SAMPLE_SIZE: usize = 512;

/// Broad grouping of signatures used by listings and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Raster images.
    Image,
    /// Readable text, including ANSI art.
    Text,
    /// Executables and self-extracting archives.
    Program,
    /// Compressed archives and disk images.
    Archive,
    /// Audio, documents and anything unrecognized.
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Program => "program",
            Self::Archive => "archive",
            Self::Other => "other",
        })
    }
}

/// The classified format of a byte sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Signature {
    /// ZSoft PC Paintbrush.
    Pcx,
    /// Graphics Interchange Format.
    Gif,
    /// JPEG/JFIF.
    Jpeg,
    /// Portable Network Graphics.
    Png,
    /// Google WebP.
    Webp,
    /// AV1 Image File Format.
    Avif,
    /// Windows/OS2 bitmap.
    Bmp,
    /// Tagged Image File Format.
    Tiff,
    /// IFF interleaved or packed bitmap (Deluxe Paint, Amiga).
    Ilbm,

    /// Text without any special markers.
    PlainText,
    /// Text with a UTF-8 byte-order mark.
    Utf8Text,
    /// UTF-16 text, with or without a byte-order mark.
    Utf16Text,
    /// UTF-32 text with a byte-order mark.
    Utf32Text,
    /// Text containing ANSI escape sequences.
    AnsiText,

    /// MS-DOS MZ executable.
    DosExecutable,
    /// Self-extracting ZIP (PKSFX and friends).
    DosSfxZip,
    /// Self-extracting LHA/LHarc.
    DosSfxLha,
    /// Self-extracting ARJ.
    DosSfxArj,
    /// 16-bit Windows or OS/2 New Executable.
    WindowsNe,
    /// Linear executable (DOS extenders, OS/2, VxD).
    LinearExecutable,
    /// Windows Portable Executable.
    WindowsPe,
    /// AmigaOS hunk executable.
    AmigaHunk,
    /// Executable and Linkable Format.
    Elf,

    /// PKWARE ZIP.
    Zip,
    /// Robert Jung ARJ.
    Arj,
    /// System Enhancement Associates ARC (and PKPAK).
    Arc,
    /// LHA/LZH (LHarc).
    Lha,
    /// WinAce ACE.
    Ace,
    /// Roshal RAR.
    Rar,
    /// Rahul Dhesi ZOO.
    Zoo,
    /// 7-Zip.
    SevenZip,
    /// POSIX/ustar tape archive.
    Tar,
    /// gzip stream.
    Gzip,
    /// bzip2 stream.
    Bzip2,
    /// xz stream.
    Xz,
    /// Zstandard stream.
    Zstd,
    /// Microsoft Cabinet.
    Cab,
    /// ISO 9660 CD-ROM image.
    Iso9660,

    /// MPEG audio layer 3.
    Mp3,
    /// RIFF WAVE audio.
    Wav,
    /// Standard MIDI file.
    Midi,
    /// ProTracker-style module.
    ModTracker,
    /// FastTracker 2 extended module.
    Xm,
    /// Scream Tracker 3 module.
    S3m,
    /// Impulse Tracker module.
    ImpulseTracker,
    /// Portable Document Format.
    Pdf,
    /// Rich Text Format.
    Rtf,

    /// Nothing matched: generic binary data.
    Unknown,
}

impl Signature {
    /// Returns the category this signature belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Pcx
            | Self::Gif
            | Self::Jpeg
            | Self::Png
            | Self::Webp
            | Self::Avif
            | Self::Bmp
            | Self::Tiff
            | Self::Ilbm => Category::Image,
            Self::PlainText
            | Self::Utf8Text
            | Self::Utf16Text
            | Self::Utf32Text
            | Self::AnsiText => Category::Text,
            Self::DosExecutable
            | Self::DosSfxZip
            | Self::DosSfxLha
            | Self::DosSfxArj
            | Self::WindowsNe
            | Self::LinearExecutable
            | Self::WindowsPe
            | Self::AmigaHunk
            | Self::Elf => Category::Program,
            Self::Zip
            | Self::Arj
            | Self::Arc
            | Self::Lha
            | Self::Ace
            | Self::Rar
            | Self::Zoo
            | Self::SevenZip
            | Self::Tar
            | Self::Gzip
            | Self::Bzip2
            | Self::Xz
            | Self::Zstd
            | Self::Cab
            | Self::Iso9660 => Category::Archive,
            Self::Mp3
            | Self::Wav
            | Self::Midi
            | Self::ModTracker
            | Self::Xm
            | Self::S3m
            | Self::ImpulseTracker
            | Self::Pdf
            | Self::Rtf
            | Self::Unknown => Category::Other,
        }
    }

    /// Returns `true` for raster image formats.
    #[must_use]
    pub const fn is_image(self) -> bool {
        matches!(self.category(), Category::Image)
    }

    /// Returns `true` for readable text formats.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self.category(), Category::Text)
    }

    /// Returns `true` for executables, including self-extractors.
    #[must_use]
    pub const fn is_program(self) -> bool {
        matches!(self.category(), Category::Program)
    }

    /// Returns `true` for compressed archives and disk images.
    #[must_use]
    pub const fn is_archive(self) -> bool {
        matches!(self.category(), Category::Archive)
    }

    /// Returns `true` for text encodings that are never rendered.
    #[must_use]
    pub const fn is_wide_text(self) -> bool {
        matches!(self, Self::Utf16Text | Self::Utf32Text)
    }

    /// Human readable description.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Pcx => "ZSoft PC Paintbrush image",
            Self::Gif => "GIF image",
            Self::Jpeg => "JPEG image",
            Self::Png => "PNG image",
            Self::Webp => "WebP image",
            Self::Avif => "AVIF image",
            Self::Bmp => "BMP image",
            Self::Tiff => "TIFF image",
            Self::Ilbm => "IFF interleaved bitmap",
            Self::PlainText => "plain text",
            Self::Utf8Text => "UTF-8 text",
            Self::Utf16Text => "UTF-16 text",
            Self::Utf32Text => "UTF-32 text",
            Self::AnsiText => "ANSI escaped text",
            Self::DosExecutable => "MS-DOS executable",
            Self::DosSfxZip => "self-extracting ZIP archive",
            Self::DosSfxLha => "self-extracting LHA archive",
            Self::DosSfxArj => "self-extracting ARJ archive",
            Self::WindowsNe => "Windows 16-bit executable",
            Self::LinearExecutable => "linear executable",
            Self::WindowsPe => "Windows executable",
            Self::AmigaHunk => "Amiga executable",
            Self::Elf => "ELF executable",
            Self::Zip => "ZIP archive",
            Self::Arj => "ARJ archive",
            Self::Arc => "ARC archive",
            Self::Lha => "LHA archive",
            Self::Ace => "ACE archive",
            Self::Rar => "RAR archive",
            Self::Zoo => "ZOO archive",
            Self::SevenZip => "7z archive",
            Self::Tar => "tar archive",
            Self::Gzip => "gzip compressed",
            Self::Bzip2 => "bzip2 compressed",
            Self::Xz => "xz compressed",
            Self::Zstd => "zstd compressed",
            Self::Cab => "Microsoft cabinet",
            Self::Iso9660 => "ISO 9660 CD image",
            Self::Mp3 => "MP3 audio",
            Self::Wav => "WAVE audio",
            Self::Midi => "MIDI music",
            Self::ModTracker => "tracker module",
            Self::Xm => "FastTracker 2 module",
            Self::S3m => "Scream Tracker 3 module",
            Self::ImpulseTracker => "Impulse Tracker module",
            Self::Pdf => "PDF document",
            Self::Rtf => "rich text document",
            Self::Unknown => "binary data",
        }
    }

    /// Maps a filename extension to the signature it conventionally carries.
    ///
    /// Used for declared listings where only member names are known.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pcx" => Self::Pcx,
            "gif" => Self::Gif,
            "jpg" | "jpeg" | "jfif" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            "avif" => Self::Avif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "iff" | "lbm" | "ilbm" => Self::Ilbm,
            "txt" | "nfo" | "diz" | "asc" | "doc" | "me" | "1st" | "now" | "faq" | "lst"
            | "readme" => Self::PlainText,
            "ans" => Self::AnsiText,
            "exe" | "com" => Self::DosExecutable,
            "zip" => Self::Zip,
            "arj" => Self::Arj,
            "arc" | "pak" => Self::Arc,
            "lha" | "lzh" => Self::Lha,
            "ace" => Self::Ace,
            "rar" => Self::Rar,
            "zoo" => Self::Zoo,
            "7z" => Self::SevenZip,
            "tar" => Self::Tar,
            "gz" | "tgz" => Self::Gzip,
            "bz2" | "tbz" | "tbz2" => Self::Bzip2,
            "xz" | "txz" => Self::Xz,
            "zst" | "tzst" => Self::Zstd,
            "cab" => Self::Cab,
            "iso" => Self::Iso9660,
            "mp3" => Self::Mp3,
            "wav" => Self::Wav,
            "mid" | "midi" => Self::Midi,
            "mod" => Self::ModTracker,
            "xm" => Self::Xm,
            "s3m" => Self::S3m,
            "it" => Self::ImpulseTracker,
            "pdf" => Self::Pdf,
            "rtf" => Self::Rtf,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Classifies a whole file held in memory.
#[must_use]
pub fn classify(bytes: &[u8]) -> Signature {
    magic::find(bytes).unwrap_or_else(|| sniff::sniff(bytes))
}

/// Classifies at most the first [`SAMPLE_SIZE`] bytes.
#[must_use]
pub fn classify_prefix(bytes: &[u8]) -> Signature {
    classify(&bytes[..bytes.len().min(SAMPLE_SIZE)])
}

/// Reads up to [`SAMPLE_SIZE`] bytes from `reader` and classifies them.
pub fn classify_reader<R: Read>(reader: R) -> std::io::Result<Signature> {
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    reader.take(SAMPLE_SIZE as u64).read_to_end(&mut sample)?;
    Ok(classify(&sample))
}

/// Reads and classifies an entire file.
pub fn classify_path(path: &Path) -> std::io::Result<Signature> {
    let bytes = std::fs::read(path)?;
    Ok(classify(&bytes))
}

/// Classifies the first [`SAMPLE_SIZE`] bytes of a file.
pub fn sniff_path(path: &Path) -> std::io::Result<Signature> {
    classify_reader(File::open(path)?)
}
