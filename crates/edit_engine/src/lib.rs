//! Edit Engine - reversible operations, undo/redo history, and gestures
//!
//! Every user-visible mutation is one `HistoryOp`: applying an op returns
//! its exact inverse, the `UndoManager` keeps both stacks, and the
//! `EditorEngine` turns pointer and keyboard gestures into recorded ops.

mod annotation_ops;
mod error;
mod gesture;
mod line_ops;
mod op;
mod undo;
mod word_ops;

pub use annotation_ops::*;
pub use error::*;
pub use gesture::*;
pub use line_ops::*;
pub use op::*;
pub use undo::*;
pub use word_ops::*;
