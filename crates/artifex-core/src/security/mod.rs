//! Guards applied by the built-in unpackers.

pub mod path;
pub mod quota;
pub mod zipbomb;

pub use path::member_path;
pub use quota::QuotaTracker;
pub use zipbomb::validate_compression_ratio;
