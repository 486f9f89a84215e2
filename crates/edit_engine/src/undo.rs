//! Undo/redo stacks with checkpoint-based dirty tracking

use crate::{HistoryOp, OpKind};

/// An entry in the undo stack
struct UndoEntry {
    /// The original operation
    op: Box<dyn HistoryOp>,
    /// Its inverse, captured at apply time
    inverse: Box<dyn HistoryOp>,
}

/// Manages the undo and redo stacks.
///
/// Operations exist in exactly one of the two stacks; pushing a new
/// operation always clears redo. Checkpoints are ordinary stack entries,
/// which lets "unsaved changes" be derived by scanning from the top
/// instead of keeping a separate dirty flag.
pub struct UndoManager {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<Box<dyn HistoryOp>>,
    max_entries: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: 200,
        }
    }

    /// Create with a custom depth limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    /// Record an applied operation together with its inverse
    pub fn push(&mut self, op: Box<dyn HistoryOp>, inverse: Box<dyn HistoryOp>) {
        self.redo_stack.clear();
        self.undo_stack.push(UndoEntry { op, inverse });
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the top entry for undo, returning its inverse to apply.
    /// The original moves to the redo stack. `None` on an empty stack.
    pub fn pop_undo(&mut self) -> Option<Box<dyn HistoryOp>> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.op);
        Some(entry.inverse)
    }

    /// Pop an operation for redo. `None` on an empty stack.
    pub fn pop_redo(&mut self) -> Option<Box<dyn HistoryOp>> {
        self.redo_stack.pop()
    }

    /// Re-record a redone operation with its fresh inverse
    pub fn push_redone(&mut self, op: Box<dyn HistoryOp>, inverse: Box<dyn HistoryOp>) {
        self.undo_stack.push(UndoEntry { op, inverse });
    }

    /// Whether undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Derived query: does any operation sit above the most recent
    /// checkpoint? An empty stack counts as clean.
    pub fn has_unsaved_changes(&self) -> bool {
        // Scanning down from the top for the nearest checkpoint reduces to
        // inspecting the top entry: anything other than a checkpoint there
        // is an operation above every checkpoint below it.
        match self.undo_stack.last() {
            Some(entry) => entry.op.kind() != OpKind::Checkpoint,
            None => false,
        }
    }

    /// Clear all history (document load boundary)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Checkpoint;

    fn entry() -> (Box<dyn HistoryOp>, Box<dyn HistoryOp>) {
        (Box::new(crate::AddLine::new(1, 100.0)), Box::new(Checkpoint))
    }

    #[test]
    fn push_clears_redo() {
        let mut mgr = UndoManager::new();
        let (op, inv) = entry();
        mgr.push(op, inv);
        mgr.pop_undo();
        assert!(mgr.can_redo());

        let (op, inv) = entry();
        mgr.push(op, inv);
        assert!(!mgr.can_redo());
    }

    #[test]
    fn depth_limit_drops_the_oldest_entries() {
        let mut mgr = UndoManager::with_limit(3);
        for _ in 0..5 {
            let (op, inv) = entry();
            mgr.push(op, inv);
        }
        let mut popped = 0;
        while mgr.pop_undo().is_some() {
            popped += 1;
        }
        assert_eq!(popped, 3);
    }

    #[test]
    fn checkpoint_on_top_means_clean() {
        let mut mgr = UndoManager::new();
        assert!(!mgr.has_unsaved_changes());

        let (op, inv) = entry();
        mgr.push(op, inv);
        assert!(mgr.has_unsaved_changes());

        mgr.push(Box::new(Checkpoint), Box::new(Checkpoint));
        assert!(!mgr.has_unsaved_changes());

        mgr.pop_undo();
        assert!(mgr.has_unsaved_changes());
    }
}
