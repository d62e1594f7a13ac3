//! In-memory archive builders for tests.
//!
//! # Panics
//!
//! Every function panics on I/O errors; they only write to memory.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

/// Builds a TAR archive of regular files, each `(path, content)`.
///
/// ```
/// use artifex_core::test_utils::create_test_tar;
///
/// let data = create_test_tar(&[("README.TXT", b"hello"), ("DOCS/GUIDE.TXT", b"world")]);
/// assert_eq!(data.len() % 512, 0);
/// ```
#[must_use]
pub fn create_test_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut ar = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        ar.append_data(&mut header, path, *data).unwrap();
    }
    ar.into_inner().unwrap()
}

/// Builds a stored (uncompressed) ZIP archive, each entry `(path, content)`.
///
/// Paths ending in `/` become directory entries.
#[must_use]
pub fn create_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    create_zip_with(entries, zip::CompressionMethod::Stored)
}

/// Builds a deflated ZIP archive, for compression ratio tests.
#[must_use]
pub fn create_deflated_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    create_zip_with(entries, zip::CompressionMethod::Deflated)
}

/// Builds a single-member ZIP whose member uses PKZIP 1.x Shrink (method 1).
///
/// Every byte is written as a 9-bit literal code, which any unshrinker
/// accepts. Keep `data` under a few thousand bytes so the code table never
/// fills.
#[must_use]
pub fn create_shrunk_zip(name: &str, data: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(data.len() * 9 / 8 + 1);
    let mut bits: u32 = 0;
    let mut pending = 0;
    for &byte in data {
        bits |= u32::from(byte) << pending;
        pending += 9;
        while pending >= 8 {
            packed.push(bits.to_le_bytes()[0]);
            bits >>= 8;
            pending -= 8;
        }
    }
    if pending > 0 {
        packed.push(bits.to_le_bytes()[0]);
    }

    let mut crc = flate2::Crc::new();
    crc.update(data);
    let crc = crc.sum();
    let name_len = u16::try_from(name.len()).unwrap();
    let packed_len = u32::try_from(packed.len()).unwrap();
    let data_len = u32::try_from(data.len()).unwrap();

    // Version 1.0, no flags, method 1, 1980-01-01 00:00.
    let mut common = Vec::new();
    common.extend_from_slice(&10u16.to_le_bytes());
    common.extend_from_slice(&0u16.to_le_bytes());
    common.extend_from_slice(&1u16.to_le_bytes());
    common.extend_from_slice(&0u16.to_le_bytes());
    common.extend_from_slice(&0x21u16.to_le_bytes());
    common.extend_from_slice(&crc.to_le_bytes());
    common.extend_from_slice(&packed_len.to_le_bytes());
    common.extend_from_slice(&data_len.to_le_bytes());
    common.extend_from_slice(&name_len.to_le_bytes());
    common.extend_from_slice(&0u16.to_le_bytes());

    let mut out = Vec::new();
    out.extend_from_slice(b"PK\x03\x04");
    out.extend_from_slice(&common);
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&packed);

    let central_offset = u32::try_from(out.len()).unwrap();
    out.extend_from_slice(b"PK\x01\x02");
    out.extend_from_slice(&10u16.to_le_bytes());
    out.extend_from_slice(&common);
    // Comment length, disk, internal and external attributes, local offset.
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    let central_len = u32::try_from(out.len()).unwrap() - central_offset;

    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&central_len.to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

fn create_zip_with(entries: &[(&str, &[u8])], method: zip::CompressionMethod) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(0o644);

    for (path, data) in entries {
        if path.ends_with('/') {
            zip.add_directory(*path, options).unwrap();
            continue;
        }
        zip.start_file(*path, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}
