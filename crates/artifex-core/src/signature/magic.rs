//! Magic-byte matchers for legacy and modern formats.
//!
//! Each matcher inspects the sample independently and returns a signature
//! only on a positive match. Offsets beyond the sample simply fail to match,
//! so truncated input never panics.

use super::Signature;
use super::sniff;

/// Self-extractor stubs embed their archive within the first 64 KiB.
const SFX_SCAN_LIMIT: usize = 64 * 1024;

type Matcher = fn(&[u8]) -> Option<Signature>;

/// Matchers in evaluation order. Executables come before archives so a
/// self-extractor is reported as such rather than as its embedded archive.
const MATCHERS: &[Matcher] = &[
    images,
    wide_text,
    documents,
    executable,
    archives,
    audio,
    ansi,
];

/// Runs every legacy matcher, returning the first hit.
pub(super) fn find(bytes: &[u8]) -> Option<Signature> {
    MATCHERS.iter().find_map(|matcher| matcher(bytes))
}

fn at(bytes: &[u8], offset: usize, magic: &[u8]) -> bool {
    bytes
        .get(offset..offset + magic.len())
        .is_some_and(|window| window == magic)
}

fn contains(bytes: &[u8], needle: &[u8]) -> bool {
    bytes.windows(needle.len()).any(|w| w == needle)
}

fn le_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let b = bytes.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

fn le_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let b = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn images(b: &[u8]) -> Option<Signature> {
    if at(b, 0, b"GIF87a") || at(b, 0, b"GIF89a") {
        return Some(Signature::Gif);
    }
    if at(b, 0, &[0xFF, 0xD8, 0xFF]) {
        return Some(Signature::Jpeg);
    }
    if at(b, 0, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(Signature::Png);
    }
    if at(b, 0, b"RIFF") && at(b, 8, b"WEBP") {
        return Some(Signature::Webp);
    }
    if at(b, 4, b"ftypavif") || at(b, 4, b"ftypavis") {
        return Some(Signature::Avif);
    }
    if at(b, 0, b"II*\0") || at(b, 0, b"MM\0*") {
        return Some(Signature::Tiff);
    }
    if at(b, 0, b"FORM") && (at(b, 8, b"ILBM") || at(b, 8, b"PBM ") || at(b, 8, b"ACBM")) {
        return Some(Signature::Ilbm);
    }
    if is_pcx(b) {
        return Some(Signature::Pcx);
    }
    if is_bmp(b) {
        return Some(Signature::Bmp);
    }
    None
}

/// PCX has no magic string, only a plausible fixed header: manufacturer
/// `0x0A`, a known version, RLE encoding and a valid bit depth.
fn is_pcx(b: &[u8]) -> bool {
    b.len() >= 128
        && b[0] == 0x0A
        && matches!(b[1], 0 | 2 | 3 | 4 | 5)
        && b[2] == 1
        && matches!(b[3], 1 | 2 | 4 | 8)
}

fn is_bmp(b: &[u8]) -> bool {
    at(b, 0, b"BM")
        && le_u32(b, 6) == Some(0)
        && matches!(le_u32(b, 14), Some(12 | 40 | 52 | 56 | 64 | 108 | 124))
}

fn wide_text(b: &[u8]) -> Option<Signature> {
    if at(b, 0, &[0xFF, 0xFE, 0x00, 0x00]) || at(b, 0, &[0x00, 0x00, 0xFE, 0xFF]) {
        return Some(Signature::Utf32Text);
    }
    if at(b, 0, &[0xFF, 0xFE]) || at(b, 0, &[0xFE, 0xFF]) || sniff::looks_like_utf16(b) {
        return Some(Signature::Utf16Text);
    }
    if at(b, 0, &[0xEF, 0xBB, 0xBF]) {
        return Some(Signature::Utf8Text);
    }
    None
}

fn documents(b: &[u8]) -> Option<Signature> {
    if at(b, 0, b"%PDF-") {
        return Some(Signature::Pdf);
    }
    if at(b, 0, b"{\\rtf") {
        return Some(Signature::Rtf);
    }
    None
}

fn executable(b: &[u8]) -> Option<Signature> {
    if at(b, 0, &[0x00, 0x00, 0x03, 0xF3]) {
        return Some(Signature::AmigaHunk);
    }
    if at(b, 0, &[0x7F, b'E', b'L', b'F']) {
        return Some(Signature::Elf);
    }
    if !(at(b, 0, b"MZ") || at(b, 0, b"ZM")) {
        return None;
    }
    let stub = &b[..b.len().min(SFX_SCAN_LIMIT)];
    if contains(stub, b"PKSFX") || contains(stub, b"PK\x03\x04") {
        return Some(Signature::DosSfxZip);
    }
    if contains(stub, b"LHa's SFX")
        || contains(stub, b"LHA's SFX")
        || contains(stub, b"LHarc's SFX")
    {
        return Some(Signature::DosSfxLha);
    }
    if at(b, 0x1C, b"RJSX") {
        return Some(Signature::DosSfxArj);
    }
    // e_lfanew points at the extended header for NE/LE/PE images.
    let extended = le_u32(b, 0x3C)
        .and_then(|offset| usize::try_from(offset).ok())
        .filter(|&offset| offset >= 0x40);
    if let Some(offset) = extended {
        if at(b, offset, b"PE\0\0") {
            return Some(Signature::WindowsPe);
        }
        if at(b, offset, b"NE") {
            return Some(Signature::WindowsNe);
        }
        if at(b, offset, b"LE") || at(b, offset, b"LX") {
            return Some(Signature::LinearExecutable);
        }
    }
    Some(Signature::DosExecutable)
}

fn archives(b: &[u8]) -> Option<Signature> {
    if at(b, 0, b"PK\x03\x04") || at(b, 0, b"PK\x05\x06") || at(b, 0, b"PK\x07\x08") {
        return Some(Signature::Zip);
    }
    if at(b, 0, &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]) {
        return Some(Signature::SevenZip);
    }
    if at(b, 0, b"Rar!\x1A\x07\x00") || at(b, 0, b"Rar!\x1A\x07\x01\x00") {
        return Some(Signature::Rar);
    }
    if at(b, 7, b"**ACE**") {
        return Some(Signature::Ace);
    }
    if at(b, 0, b"ZOO ") && at(b, 20, &[0xDC, 0xA7, 0xC4, 0xFD]) {
        return Some(Signature::Zoo);
    }
    if is_lha(b) {
        return Some(Signature::Lha);
    }
    if at(b, 0, &[0x60, 0xEA]) && le_u16(b, 2).is_some_and(|size| (1..=2600).contains(&size)) {
        return Some(Signature::Arj);
    }
    if is_arc(b) {
        return Some(Signature::Arc);
    }
    if at(b, 0, b"MSCF\0\0\0\0") {
        return Some(Signature::Cab);
    }
    if at(b, 0, &[0x1F, 0x8B, 0x08]) {
        return Some(Signature::Gzip);
    }
    if at(b, 0, b"BZh") && b.get(3).is_some_and(|level| (b'1'..=b'9').contains(level)) {
        return Some(Signature::Bzip2);
    }
    if at(b, 0, &[0xFD, b'7', b'z', b'X', b'Z', 0x00]) {
        return Some(Signature::Xz);
    }
    if at(b, 0, &[0x28, 0xB5, 0x2F, 0xFD]) {
        return Some(Signature::Zstd);
    }
    if at(b, 257, b"ustar") {
        return Some(Signature::Tar);
    }
    if at(b, 0x8001, b"CD001") {
        return Some(Signature::Iso9660);
    }
    None
}

/// LHA level 0-2 headers carry the method id, e.g. `-lh5-`, at offset 2.
fn is_lha(b: &[u8]) -> bool {
    (at(b, 2, b"-lh") || at(b, 2, b"-lz"))
        && b.get(5).is_some_and(|m| m.is_ascii_alphanumeric())
        && at(b, 6, b"-")
}

/// ARC headers start with `0x1A`, a method byte and a NUL-terminated 8.3
/// filename. The filename check keeps DOS EOF markers from matching.
fn is_arc(b: &[u8]) -> bool {
    if b.len() < 29 || b[0] != 0x1A || !(1..=11).contains(&b[1]) {
        return false;
    }
    let name = &b[2..15];
    match name.iter().position(|&c| c == 0) {
        Some(0) | None => false,
        Some(end) => name[..end].iter().all(|c| c.is_ascii_graphic()),
    }
}

fn audio(b: &[u8]) -> Option<Signature> {
    let mpeg_frame = b.len() >= 2 && b[0] == 0xFF && matches!(b[1], 0xFB | 0xF3 | 0xF2 | 0xFA);
    if at(b, 0, b"ID3") || mpeg_frame {
        return Some(Signature::Mp3);
    }
    if at(b, 0, b"RIFF") && at(b, 8, b"WAVE") {
        return Some(Signature::Wav);
    }
    if at(b, 0, b"MThd") {
        return Some(Signature::Midi);
    }
    if at(b, 0, b"Extended Module: ") {
        return Some(Signature::Xm);
    }
    if at(b, 44, b"SCRM") {
        return Some(Signature::S3m);
    }
    if at(b, 0, b"IMPM") {
        return Some(Signature::ImpulseTracker);
    }
    let tags: [&[u8]; 7] = [b"M.K.", b"M!K!", b"FLT4", b"FLT8", b"4CHN", b"6CHN", b"8CHN"];
    if tags.iter().any(|tag| at(b, 1080, tag)) {
        return Some(Signature::ModTracker);
    }
    None
}

/// ANSI art is text that carries CSI escape sequences. Generic sniffing
/// would call it plain text, so it is matched here first.
fn ansi(b: &[u8]) -> Option<Signature> {
    let body = sniff::strip_sauce(b);
    (sniff::looks_like_text(body) && sniff::contains_csi(body)).then_some(Signature::AnsiText)
}

#[cfg(test)]
mod tests {
    use super::super::classify;
    use super::*;

    fn padded(head: &[u8], len: usize) -> Vec<u8> {
        let mut v = head.to_vec();
        v.resize(len, 0);
        v
    }

    #[test]
    fn test_images() {
        assert_eq!(classify(b"GIF87a\x10\x00"), Signature::Gif);
        assert_eq!(classify(&[0xFF, 0xD8, 0xFF, 0xE0]), Signature::Jpeg);
        assert_eq!(classify(b"RIFF\0\0\0\0WEBPVP8 "), Signature::Webp);
        assert_eq!(classify(b"\0\0\0\x1cftypavif"), Signature::Avif);
        assert_eq!(classify(b"FORM\0\0\x10\0ILBMBMHD"), Signature::Ilbm);
        assert_eq!(classify(&padded(&[0x0A, 5, 1, 8], 128)), Signature::Pcx);
    }

    #[test]
    fn test_pcx_needs_full_header() {
        // A newline followed by control bytes is not a picture.
        assert_ne!(classify(&[0x0A, 5, 1, 8]), Signature::Pcx);
    }

    #[test]
    fn test_bmp() {
        let mut bmp = padded(b"BM", 64);
        bmp[14] = 40;
        assert_eq!(classify(&bmp), Signature::Bmp);
        // "BM" at the start of a text file is not a bitmap.
        assert_eq!(classify(b"BMX release notes\r\n"), Signature::PlainText);
    }

    #[test]
    fn test_dos_executables() {
        assert_eq!(classify(&padded(b"MZ", 64)), Signature::DosExecutable);

        let mut pe = padded(b"MZ", 0x90);
        pe[0x3C] = 0x80;
        pe[0x80..0x84].copy_from_slice(b"PE\0\0");
        assert_eq!(classify(&pe), Signature::WindowsPe);

        let mut ne = padded(b"MZ", 0x90);
        ne[0x3C] = 0x80;
        ne[0x80..0x82].copy_from_slice(b"NE");
        assert_eq!(classify(&ne), Signature::WindowsNe);
    }

    #[test]
    fn test_self_extractors() {
        let mut zip = padded(b"MZ", 400);
        zip[100..105].copy_from_slice(b"PKSFX");
        assert_eq!(classify(&zip), Signature::DosSfxZip);

        let mut lha = padded(b"MZ", 400);
        lha[36..45].copy_from_slice(b"LHa's SFX");
        assert_eq!(classify(&lha), Signature::DosSfxLha);

        let mut arj = padded(b"MZ", 64);
        arj[0x1C..0x20].copy_from_slice(b"RJSX");
        assert_eq!(classify(&arj), Signature::DosSfxArj);
    }

    #[test]
    fn test_legacy_archives() {
        assert_eq!(classify(b"\x60\xea\x29\x00\x1e\x06"), Signature::Arj);
        assert_eq!(classify(b"\x25\x00-lh5-\x10\x00\x00\x00"), Signature::Lha);
        assert_eq!(classify(b"\0\0\0\0\0\0\0**ACE**\0"), Signature::Ace);
        assert_eq!(classify(b"Rar!\x1A\x07\x00\xCF"), Signature::Rar);

        let mut zoo = padded(b"ZOO 2.10 Archive.\x1A", 32);
        zoo[20..24].copy_from_slice(&[0xDC, 0xA7, 0xC4, 0xFD]);
        assert_eq!(classify(&zoo), Signature::Zoo);

        let mut arc = padded(&[0x1A, 0x08], 40);
        arc[2..14].copy_from_slice(b"README.DOC\0\0");
        assert_eq!(classify(&arc), Signature::Arc);
    }

    #[test]
    fn test_eof_marker_is_not_arc() {
        let mut text = b"hello world\r\n".to_vec();
        text.push(0x1A);
        assert_eq!(classify(&text), Signature::PlainText);
        assert_ne!(classify(&padded(&[0x1A, 0x02], 40)), Signature::Arc);
    }

    #[test]
    fn test_modern_archives() {
        assert_eq!(classify(b"PK\x03\x04\x14\x00"), Signature::Zip);
        assert_eq!(classify(b"PK\x05\x06"), Signature::Zip);
        assert_eq!(classify(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0, 4]), Signature::SevenZip);
        assert_eq!(classify(&[0x1F, 0x8B, 0x08, 0x00]), Signature::Gzip);
        assert_eq!(classify(b"BZh91AY&SY"), Signature::Bzip2);
        assert_eq!(classify(&[0x28, 0xB5, 0x2F, 0xFD, 0x04]), Signature::Zstd);

        let mut tar = padded(b"file.txt", 512);
        tar[257..262].copy_from_slice(b"ustar");
        assert_eq!(classify(&tar), Signature::Tar);
    }

    #[test]
    fn test_wide_text() {
        assert_eq!(classify(&[0xFF, 0xFE, b'h', 0]), Signature::Utf16Text);
        assert_eq!(classify(&[0xFF, 0xFE, 0, 0, b'h', 0, 0, 0]), Signature::Utf32Text);
        assert_eq!(classify(b"h\0e\0l\0l\0o\0 \0w\0o\0"), Signature::Utf16Text);
        assert_eq!(classify(b"\xEF\xBB\xBFhello"), Signature::Utf8Text);
    }

    #[test]
    fn test_ansi_text() {
        let art = b"\x1b[0;1;34m\xdb\xdb\xdb\x1b[0m greets\r\n";
        assert_eq!(classify(art), Signature::AnsiText);
    }

    #[test]
    fn test_ansi_with_sauce_trailer() {
        let mut art = b"\x1b[1;33mHELLO\x1b[0m\r\n\x1aSAUCE00".to_vec();
        art.extend_from_slice(&[0u8; 100]);
        assert_eq!(classify(&art), Signature::AnsiText);
    }

    #[test]
    fn test_audio() {
        assert_eq!(classify(b"ID3\x03\x00"), Signature::Mp3);
        assert_eq!(classify(b"MThd\0\0\0\x06"), Signature::Midi);
        assert_eq!(classify(b"IMPMsong"), Signature::ImpulseTracker);
        assert_eq!(classify(b"Extended Module: tune"), Signature::Xm);
    }

    #[test]
    fn test_truncated_headers_do_not_panic() {
        for len in 0..16 {
            let sample = vec![0x4D; len];
            let _ = classify(&sample);
            let _ = classify(&vec![0x60; len]);
        }
    }
}
