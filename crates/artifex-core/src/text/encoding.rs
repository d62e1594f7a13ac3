//! Text encoding classification.

use super::TextEncoding;
use crate::signature;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decides which encoding a cleaned text sample uses.
///
/// The caller is expected to have removed escape sequences and SAUCE data
/// with [`super::sanitize`] first.
///
/// Decision order:
///
/// 1. UTF-16/UTF-32 samples and anything containing NUL bytes are rejected
///    as [`TextEncoding::Unknown`].
/// 2. A UTF-8 byte-order mark, or valid UTF-8 with at least one multi-byte
///    sequence, is [`TextEncoding::Utf8`].
/// 3. Any byte pattern only CP437 text produces is [`TextEncoding::Cp437`].
///    This includes the control-range glyphs, so ASCII art drawn with
///    hearts and smileys is not mistaken for plain ASCII.
/// 4. Remaining pure ASCII is [`TextEncoding::Utf8`].
/// 5. Everything else falls back to [`TextEncoding::Latin1`], which maps
///    every byte to a valid code point.
///
/// ```
/// use artifex_core::text::{TextEncoding, classify_text};
///
/// assert_eq!(classify_text(b"\xc9\xcd\xcd\xcd\xbb"), TextEncoding::Cp437);
/// assert_eq!(classify_text(b"caf\xe9 cr\xe8me"), TextEncoding::Latin1);
/// assert_eq!(classify_text("caf\u{e9}".as_bytes()), TextEncoding::Utf8);
/// ```
#[must_use]
pub fn classify_text(bytes: &[u8]) -> TextEncoding {
    if signature::classify_prefix(bytes).is_wide_text() || bytes.contains(&0) {
        return TextEncoding::Unknown;
    }
    let multibyte_utf8 = !bytes.is_ascii() && std::str::from_utf8(bytes).is_ok();
    if bytes.starts_with(UTF8_BOM) || multibyte_utf8 {
        return TextEncoding::Utf8;
    }
    if has_cp437_markers(bytes) {
        return TextEncoding::Cp437;
    }
    if bytes.is_ascii() {
        return TextEncoding::Utf8;
    }
    TextEncoding::Latin1
}

/// Control-range bytes that DOS text uses as visible glyphs (faces, card
/// suits, arrows). Tab, newlines, form feed, EOF and escape are excluded.
const fn is_cp437_glyph_control(b: u8) -> bool {
    matches!(b, 0x01..=0x06 | 0x0E..=0x19 | 0x1C..=0x1F)
}

/// Shade, box-drawing and block characters.
const fn is_cp437_box(b: u8) -> bool {
    matches!(b, 0xB0..=0xDF)
}

/// Shortest run of box bytes accepted as line art rather than accented
/// ISO-8859-1 capitals.
const BOX_RUN: usize = 3;

fn has_cp437_markers(bytes: &[u8]) -> bool {
    let mut run = 0;
    for &b in bytes {
        // 0x80..=0x9F are C1 controls in ISO-8859-1 but accented letters
        // in CP437.
        if matches!(b, 0x80..=0x9F) || is_cp437_glyph_control(b) {
            return true;
        }
        if is_cp437_box(b) {
            run += 1;
            if run >= BOX_RUN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
