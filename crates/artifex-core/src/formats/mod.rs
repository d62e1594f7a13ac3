//! Archive unpackers.

pub mod compression;
pub mod external;
pub mod registry;
pub mod sevenz;
pub mod tar;
pub mod traits;
pub mod zip;

pub use external::ExternalUnpacker;
pub use registry::UnpackerRegistry;
pub use sevenz::SevenZipUnpacker;
pub use tar::TarUnpacker;
pub use traits::Unpacker;
pub use zip::ZipUnpacker;
