//! Generic text/binary sniffing used when no format matcher fires.

use super::Signature;

const SAUCE_MARKER: &[u8] = b"SAUCE00";

/// Returns the part of `bytes` before a SAUCE record, if one is present.
///
/// SAUCE records are NUL padded, so text checks must not see them.
pub(crate) fn strip_sauce(bytes: &[u8]) -> &[u8] {
    bytes
        .windows(SAUCE_MARKER.len())
        .rposition(|w| w == SAUCE_MARKER)
        .map_or(bytes, |pos| &bytes[..pos])
}

/// Control bytes that never appear in legitimate text.
///
/// Tab, line feed, form feed, carriage return, the DOS EOF marker `0x1A`
/// and escape `0x1B` are allowed; CP437 glyphs drawn from the remaining
/// control range are tolerated in small numbers.
const fn is_binary_control(b: u8) -> bool {
    matches!(b, 0x01..=0x08 | 0x0B | 0x0E..=0x19 | 0x1C..=0x1F)
}

/// Heuristic text test: no NUL bytes and at most one binary control byte
/// in twenty.
pub(crate) fn looks_like_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes.contains(&0) {
        return false;
    }
    let controls = bytes.iter().filter(|&&b| is_binary_control(b)).count();
    controls * 20 <= bytes.len()
}

/// Returns `true` when `bytes` contains `ESC [ params final` with a letter
/// as the final byte.
pub(crate) fn contains_csi(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    while let Some(pos) = rest.iter().position(|&b| b == 0x1B) {
        let after = &rest[pos + 1..];
        if after.first() == Some(&b'[') {
            let params = after[1..]
                .iter()
                .take_while(|b| b.is_ascii_digit() || **b == b';')
                .count();
            if after.get(1 + params).is_some_and(u8::is_ascii_alphabetic) {
                return true;
            }
        }
        rest = after;
    }
    false
}

/// Detects BOM-less UTF-16 holding mostly ASCII: every other byte is NUL
/// and the rest are printable.
pub(crate) fn looks_like_utf16(bytes: &[u8]) -> bool {
    let len = bytes.len().min(super::SAMPLE_SIZE) & !1;
    if len < 8 {
        return false;
    }
    let sample = &bytes[..len];
    let printable = |b: u8| b.is_ascii_graphic() || matches!(b, b' ' | b'\t' | b'\r' | b'\n');
    let little = sample.chunks_exact(2).all(|c| printable(c[0]) && c[1] == 0);
    let big = sample.chunks_exact(2).all(|c| c[0] == 0 && printable(c[1]));
    little || big
}

/// Fallback classification for samples no matcher recognized.
pub(super) fn sniff(bytes: &[u8]) -> Signature {
    if looks_like_text(strip_sauce(bytes)) {
        Signature::PlainText
    } else {
        Signature::Unknown
    }
}
