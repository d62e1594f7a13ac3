//! Legacy text handling: encoding detection, control-code cleanup and
//! decoding.
//!
//! Scene text never declares its encoding. DOS releases use IBM code page
//! 437 with its box-drawing glyphs, Amiga and European releases use
//! ISO-8859-1, and later material is UTF-8. Bytes are always cleaned with
//! [`sanitize`] before [`classify_text`] looks at them, because SAUCE
//! trailers and escape sequences skew the byte statistics.

mod cp437;
pub mod encoding;
pub mod sanitize;

use std::fmt;

use serde::Serialize;

pub use encoding::classify_text;
pub use sanitize::AnsiCompat;
pub use sanitize::check_ansi;
pub use sanitize::sanitize;

/// The text encoding of a cleaned byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextEncoding {
    /// UTF-8, including plain ASCII.
    Utf8,
    /// ISO-8859-1, the Amiga and European scene default.
    Latin1,
    /// IBM PC code page 437.
    Cp437,
    /// Not renderable: UTF-16, UTF-32 or binary data.
    Unknown,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Cp437 => "CP437",
            Self::Unknown => "unknown",
        })
    }
}

/// Decodes bytes as ISO-8859-1.
///
/// The non-breaking space `0xA0` becomes a plain space and the soft hyphen
/// `0xAD` a hyphen-minus, since neither renders visibly in a browser.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0xA0 => ' ',
            0xAD => '-',
            _ => char::from(b),
        })
        .collect()
}

/// Decodes bytes as IBM code page 437.
///
/// The lower half maps to ASCII so line endings survive; `0xFF`, the CP437
/// non-breaking space, becomes a plain space.
#[must_use]
pub fn decode_cp437(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x00..=0x7F => char::from(b),
            0xFF => ' ',
            _ => cp437::HIGH[usize::from(b - 0x80)],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"caf\xe9"), "café");
        assert_eq!(decode_latin1(b"a\xa0b\xadc"), "a b-c");
    }

    #[test]
    fn test_decode_cp437() {
        assert_eq!(decode_cp437(b"\xc9\xcd\xbb"), "╔═╗");
        assert_eq!(decode_cp437(b"\xb0\xb1\xb2\xdb"), "░▒▓█");
        assert_eq!(decode_cp437(b"caf\x82\r\n"), "café\r\n");
        assert_eq!(decode_cp437(b"a\xffb"), "a b");
    }

    #[test]
    fn test_ascii_decodes_identically() {
        let text = b"Release notes\r\nVersion 1.0\r\n";
        assert_eq!(decode_latin1(text), decode_cp437(text));
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(TextEncoding::Latin1.to_string(), "ISO-8859-1");
        assert_eq!(TextEncoding::Cp437.to_string(), "CP437");
    }
}
