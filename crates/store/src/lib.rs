//! Store - document snapshot format and JSON persistence
//!
//! The persistence boundary is a value: `snapshot` captures a session as a
//! `DocumentFile`, `restore` rebuilds one, and the JSON codec in between is
//! deterministic so unchanged documents round-trip byte-identically.

mod error;
mod format;
mod serializer;

pub use error::*;
pub use format::*;
pub use serializer::*;
