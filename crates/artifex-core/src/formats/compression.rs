//! Stream codecs wrapped around TAR archives.

use std::io;
use std::io::Read;

use crate::signature::Signature;

/// Compression codec of a `.tar.*` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate).
    Gzip,
    /// Bzip2 (Burrows-Wheeler).
    Bzip2,
    /// Xz (LZMA2).
    Xz,
    /// Zstandard.
    Zstd,
}

impl CompressionCodec {
    /// Every supported codec.
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Zstd];

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// The stream signature this codec produces.
    #[must_use]
    pub const fn signature(self) -> Signature {
        match self {
            Self::Gzip => Signature::Gzip,
            Self::Bzip2 => Signature::Bzip2,
            Self::Xz => Signature::Xz,
            Self::Zstd => Signature::Zstd,
        }
    }

    /// Wraps `reader` in the matching decoder.
    ///
    /// # Errors
    ///
    /// Only the zstd decoder can fail here, when its context cannot be
    /// allocated.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Self::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_codec_name() {
        assert_eq!(CompressionCodec::Gzip.name(), "gzip");
        assert_eq!(CompressionCodec::Zstd.name(), "zstd");
    }

    #[test]
    fn test_codec_signature() {
        for codec in CompressionCodec::ALL {
            assert!(codec.signature().is_archive());
        }
    }

    #[test]
    fn test_gzip_decoder() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"PKZIP 2.04g").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut out = String::new();
        CompressionCodec::Gzip
            .decoder(compressed.as_slice())
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "PKZIP 2.04g");
    }
}
