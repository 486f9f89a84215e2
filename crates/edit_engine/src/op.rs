//! Reversible history operations

use crate::Result;
use layout_engine::{FontMetrics, GeometryProvider, LayoutConfig, SnapConfig};
use serde::{Deserialize, Serialize};
use word_model::DocumentSession;

/// The kind of a recorded operation, at gesture granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    AddNode,
    DeleteNode,
    MoveNode,
    EditText,
    AddLine,
    DeleteLine,
    AddAnnotation,
    DeleteAnnotation,
    MoveAnnotation,
    Checkpoint,
}

/// Layout collaborators an operation needs while re-applying.
///
/// Propagation triggered from inside an op is a side effect of replay and
/// is never separately recorded.
pub struct OpContext<'a> {
    pub geometry: &'a dyn GeometryProvider,
    pub metrics: &'a FontMetrics,
    pub layout: &'a LayoutConfig,
    pub snap: &'a SnapConfig,
}

/// A reversible edit.
///
/// `apply` mutates the session and returns the exact inverse, built from
/// the state observed at apply time, so `apply; undo; redo` always lands on
/// the same document.
pub trait HistoryOp: std::fmt::Debug {
    /// Apply the forward effect, returning the inverse operation
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>>;

    /// The operation kind
    fn kind(&self) -> OpKind;

    /// Human-readable name for menus and logs
    fn display_name(&self) -> &str;
}

/// Marks "document saved". A no-op on the session; its position in the
/// undo stack is what the unsaved-changes query scans for.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checkpoint;

impl HistoryOp for Checkpoint {
    fn apply(&self, _session: &mut DocumentSession, _ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        Ok(Box::new(Checkpoint))
    }

    fn kind(&self) -> OpKind {
        OpKind::Checkpoint
    }

    fn display_name(&self) -> &str {
        "Checkpoint"
    }
}
