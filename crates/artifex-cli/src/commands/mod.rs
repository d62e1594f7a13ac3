//! Subcommand implementations.

pub mod classify;
pub mod completion;
pub mod extract;
pub mod inspect;
pub mod list;
pub mod readme;
pub mod sanitize;
pub mod stats;
