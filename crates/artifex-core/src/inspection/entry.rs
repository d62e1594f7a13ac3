//! One line of a content listing.

use std::path::PathBuf;

use serde::Serialize;

use crate::DisplayValue;
use crate::Platform;
use crate::signature::Signature;

/// A file found in an extracted tree or named in a declared listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedEntry {
    /// Path relative to the archive root.
    pub relative_path: PathBuf,
    /// Size in bytes; unknown for declared listings.
    pub byte_size: Option<u64>,
    /// Sniffed or extension-derived format; `None` when not determined.
    pub signature: Option<Signature>,
    /// The file is a raster image.
    pub is_image: bool,
    /// The file is readable text.
    pub is_text: bool,
    /// The file is a program worth flagging.
    pub is_program: bool,
}

impl ExtractedEntry {
    /// Builds an entry and derives its flags.
    ///
    /// Every DOS artifact is software, so programs are not flagged on the
    /// `dos` platform.
    #[must_use]
    pub fn new(
        relative_path: PathBuf,
        byte_size: Option<u64>,
        signature: Option<Signature>,
        platform: Platform,
    ) -> Self {
        let sig = signature.unwrap_or(Signature::Unknown);
        Self {
            relative_path,
            byte_size,
            signature,
            is_image: sig.is_image(),
            is_text: sig.is_text(),
            is_program: sig.is_program() && platform != Platform::Dos,
        }
    }

    /// Display line: path, size when known, format description and flags.
    #[must_use]
    pub fn display_line(&self) -> String {
        let mut line = self.relative_path.to_string_lossy().replace('\\', "/");
        if let Some(size) = self.byte_size {
            line.push_str("  ");
            line.push_str(&DisplayValue::Bytes(size).to_string());
        }
        line.push_str("  ");
        line.push_str(self.signature.map_or("unknown", Signature::title));
        let flags = [
            (self.is_image, "[image]"),
            (self.is_text, "[text]"),
            (self.is_program, "[program]"),
        ];
        for (set, label) in flags {
            if set {
                line.push(' ');
                line.push_str(label);
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_signature() {
        let gif = ExtractedEntry::new(
            "LOGO.GIF".into(),
            Some(1500),
            Some(Signature::Gif),
            Platform::Windows,
        );
        assert!(gif.is_image && !gif.is_text && !gif.is_program);

        let exe = ExtractedEntry::new(
            "SETUP.EXE".into(),
            Some(10),
            Some(Signature::WindowsPe),
            Platform::Windows,
        );
        assert!(exe.is_program);
    }

    #[test]
    fn test_dos_programs_not_flagged() {
        let exe = ExtractedEntry::new(
            "GAME.EXE".into(),
            Some(10),
            Some(Signature::DosExecutable),
            Platform::Dos,
        );
        assert!(!exe.is_program);
    }

    #[test]
    fn test_display_line() {
        let entry = ExtractedEntry::new(
            "DOCS/README.TXT".into(),
            Some(1500),
            Some(Signature::PlainText),
            Platform::Dos,
        );
        assert_eq!(entry.display_line(), "DOCS/README.TXT  1.5 kB  plain text [text]");

        let declared = ExtractedEntry::new("DATA.BIN".into(), None, None, Platform::Dos);
        assert_eq!(declared.display_line(), "DATA.BIN  unknown");
    }
}
