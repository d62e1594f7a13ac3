//! Control-code removal for legacy text.

use std::sync::LazyLock;

use regex::bytes::Regex;

const ESC: u8 = 0x1B;
const DOS_EOF: u8 = 0x1A;

/// ANSI CSI sequences, the Amiga `ESC [ n SP p` sequence, and SAUCE
/// trailers through to the end of the buffer.
static CONTROL_CODES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\x1b\[[0-9;]*[a-zA-Z]|\x1b\[[0-9;]* p|(?s:SAUCE00.*)")
        .unwrap_or_else(|e| unreachable!("control code pattern: {e}"))
});

static CURSOR_UP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\x1b\[[0-9]*A").unwrap_or_else(|e| unreachable!("cursor-up pattern: {e}"))
});

/// Whether cleaned text can be shown as flat text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiCompat {
    /// Nothing left that a text view cannot display.
    Compatible,
    /// Cursor movement or leftover escapes make a flat rendering wrong.
    Incompatible,
}

/// Removes escape sequences, SAUCE metadata, trailing whitespace and DOS
/// EOF markers.
///
/// Removal repeats until nothing matches, so fragments joined by an earlier
/// pass cannot form a new sequence. Applying `sanitize` to its own output
/// returns the same bytes.
///
/// ```
/// use artifex_core::text::sanitize;
///
/// let raw = b"\x1b[1;33mHELLO\x1b[0m\r\n\x1aSAUCE00 art by someone";
/// assert_eq!(sanitize(raw), b"HELLO");
/// ```
#[must_use]
pub fn sanitize(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    while CONTROL_CODES.is_match(&out) {
        out = CONTROL_CODES.replace_all(&out, &b""[..]).into_owned();
    }
    let end = out
        .iter()
        .rposition(|&b| !(b.is_ascii_whitespace() || b == DOS_EOF))
        .map_or(0, |pos| pos + 1);
    out.truncate(end);
    out
}

/// Checks whether `raw` text renders correctly once sanitized.
///
/// `cleaned` must be `sanitize(raw)`. Cursor-up movement in the raw bytes
/// overwrites earlier lines, and escape bytes that survive cleaning belong
/// to sequences the sanitizer does not understand.
#[must_use]
pub fn check_ansi(raw: &[u8], cleaned: &[u8]) -> AnsiCompat {
    if CURSOR_UP.is_match(raw) || cleaned.contains(&ESC) {
        AnsiCompat::Incompatible
    } else {
        AnsiCompat::Compatible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_csi() {
        assert_eq!(sanitize(b"\x1b[0;1;37mBright\x1b[0m text"), b"Bright text");
        assert_eq!(sanitize(b"\x1b[2J\x1b[HTop"), b"Top");
    }

    #[test]
    fn test_strips_amiga_space_p() {
        assert_eq!(sanitize(b"\x1b[0 pAmiga"), b"Amiga");
        assert_eq!(sanitize(b"\x1b[ pcursor"), b"cursor");
    }

    #[test]
    fn test_strips_sauce_to_end() {
        let mut raw = b"art\r\n\x1a".to_vec();
        raw.extend_from_slice(b"SAUCE00Title");
        raw.extend_from_slice(&[0u8; 40]);
        assert_eq!(sanitize(&raw), b"art");
    }

    #[test]
    fn test_nested_fragments_removed() {
        // Removing the inner sequence joins the outer one.
        let raw = b"\x1b[\x1b[0m1mX";
        assert_eq!(sanitize(raw), b"X");
    }

    #[test]
    fn test_trims_trailing_eof_and_whitespace() {
        assert_eq!(sanitize(b"text \t\r\n\x1a\x1a"), b"text");
        assert_eq!(sanitize(b"  leading kept"), b"  leading kept");
        assert_eq!(sanitize(b"\x1a\r\n"), b"");
    }

    #[test]
    fn test_idempotent() {
        let samples: &[&[u8]] = &[
            b"\x1b[\x1b[0m1mX \x1a",
            b"SAUCE00",
            b"a\x1b[1 p\x1b[31m b \r\n",
            b"\x1b\x1b[[0mm",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_check_ansi() {
        let raw = b"\x1b[1;31mRed\x1b[0m";
        assert_eq!(check_ansi(raw, &sanitize(raw)), AnsiCompat::Compatible);

        let up = b"line one\r\n\x1b[1Aoverwrite";
        assert_eq!(check_ansi(up, &sanitize(up)), AnsiCompat::Incompatible);

        let private = b"\x1b[?7hwrapped";
        assert_eq!(check_ansi(private, &sanitize(private)), AnsiCompat::Incompatible);
    }
}
