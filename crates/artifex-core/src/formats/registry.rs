//! Unpacker selection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::InspectError;
use crate::Result;
use crate::signature;
use crate::signature::Signature;

use super::compression::CompressionCodec;
use super::external::ExternalUnpacker;
use super::sevenz::SevenZipUnpacker;
use super::tar::TarUnpacker;
use super::traits::Unpacker;
use super::zip::ZipUnpacker;

/// Bytes read from an artifact to choose its unpacker. Large enough to
/// reach self-extractor stubs and the ISO 9660 volume descriptor.
const HEAD_SIZE: u64 = 64 * 1024;

/// Ordered collection of unpackers; the first one that handles a
/// signature wins.
pub struct UnpackerRegistry {
    unpackers: Vec<Box<dyn Unpacker>>,
}

impl std::fmt::Debug for UnpackerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.unpackers.iter().map(|u| u.name())).finish()
    }
}

impl Default for UnpackerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl UnpackerRegistry {
    /// A registry with no unpackers.
    #[must_use]
    pub fn empty() -> Self {
        Self { unpackers: Vec::new() }
    }

    /// The built-in ZIP, TAR and 7z unpackers plus the external legacy
    /// archivers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.push(Box::new(ZipUnpacker));
        registry.push(Box::new(TarUnpacker::plain()));
        for codec in CompressionCodec::ALL {
            registry.push(Box::new(TarUnpacker::compressed(codec)));
        }
        registry.push(Box::new(SevenZipUnpacker));
        registry.push(Box::new(ExternalUnpacker::arj()));
        registry.push(Box::new(ExternalUnpacker::arc()));
        registry.push(Box::new(ExternalUnpacker::lha()));
        registry.push(Box::new(ExternalUnpacker::unace()));
        registry.push(Box::new(ExternalUnpacker::unrar()));
        registry.push(Box::new(ExternalUnpacker::zoo()));
        registry
    }

    fn push(&mut self, unpacker: Box<dyn Unpacker>) {
        self.unpackers.push(unpacker);
    }

    /// Adds an unpacker that takes precedence over those already present.
    pub fn register(&mut self, unpacker: Box<dyn Unpacker>) {
        self.unpackers.insert(0, unpacker);
    }

    /// Names of the registered unpackers in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.unpackers.iter().map(|u| u.name())
    }

    /// The first unpacker that handles `signature`.
    #[must_use]
    pub fn find(&self, signature: Signature) -> Option<&dyn Unpacker> {
        self.unpackers.iter().find(|u| u.handles(signature)).map(Box::as_ref)
    }

    /// Picks the unpacker for the file at `source`.
    ///
    /// The stored download has an opaque name, so the bytes decide first;
    /// the extension of `filename` (or of `source`) is the fallback.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `source` cannot be read, or
    /// [`InspectError::UnsupportedFormat`] carrying the sniffed signature
    /// when nothing matches.
    pub fn select(&self, source: &Path, filename: Option<&str>) -> Result<&dyn Unpacker> {
        let mut head = Vec::new();
        File::open(source)?.take(HEAD_SIZE).read_to_end(&mut head)?;
        let sniffed = signature::classify(&head);

        if let Some(unpacker) = self.find(sniffed) {
            debug!(signature = %sniffed, unpacker = unpacker.name(), "unpacker chosen by content");
            return Ok(unpacker);
        }

        let named = filename.map_or(source, Path::new);
        let by_extension = named
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Signature::from_extension)
            .and_then(|sig| self.find(sig));
        match by_extension {
            Some(unpacker) => {
                debug!(unpacker = unpacker.name(), "unpacker chosen by extension");
                Ok(unpacker)
            }
            None => Err(InspectError::UnsupportedFormat(sniffed)),
        }
    }
}
