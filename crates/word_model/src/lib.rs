//! Word Model - interlinear word-chain graph and baseline registry
//!
//! This crate provides the document model for the interlinear annotation
//! editor: an arena of word boxes linked into vertical chains, the per-page
//! set of text lines they attach to, and the session bundling both.

mod error;
mod graph;
mod lexicon;
mod line;
mod node_id;
mod registry;
mod session;
mod word;

pub use error::*;
pub use graph::*;
pub use lexicon::*;
pub use line::*;
pub use node_id::*;
pub use registry::*;
pub use session::*;
pub use word::*;
