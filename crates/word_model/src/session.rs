//! Document session - the word graph and baseline registry of one document
//!
//! Passed by mutable reference into every operation so that multiple
//! documents (and tests) run in isolation; there is no shared static state.

use crate::{LineId, LineRegistry, NodeId, Result, WordBox, WordGraph, WordModelError};
use serde::{Deserialize, Serialize};

/// All mutable state of the currently open document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSession {
    pub words: WordGraph,
    pub lines: LineRegistry,
}

impl DocumentSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a root word to a line, keeping graph and registry in step.
    ///
    /// Only roots may attach; a word with a parent is a programming error
    /// on the caller's side and is rejected with `NotARoot`.
    pub fn attach_root(&mut self, line_id: LineId, root: NodeId) -> Result<()> {
        let word = self
            .words
            .get(root)
            .ok_or(WordModelError::NodeNotFound(root.as_uuid()))?;
        if !word.is_root() {
            return Err(WordModelError::NotARoot(root.as_uuid()));
        }
        self.lines.attach(line_id, root)?;
        if let Some(w) = self.words.get_mut(root) {
            w.line = Some(line_id);
        }
        Ok(())
    }

    /// Detach a root from its line, if attached
    pub fn detach_root(&mut self, root: NodeId) {
        self.lines.detach(root);
        if let Some(w) = self.words.get_mut(root) {
            w.line = None;
        }
    }

    /// Delete the whole family containing `id`, detaching any member from
    /// its line. Returns the removed boxes for history capture.
    pub fn delete_family(&mut self, id: NodeId) -> Vec<WordBox> {
        let removed = self.words.remove_family(id);
        for word in &removed {
            self.lines.detach(word.id);
        }
        removed
    }

    /// Re-insert a previously removed family verbatim, restoring the root's
    /// line attachment when the line still exists.
    pub fn restore_family(&mut self, boxes: Vec<WordBox>) {
        for word in boxes {
            let attach = if word.is_root() { word.line } else { None };
            let id = word.id;
            self.words.insert(word);
            if let Some(line_id) = attach {
                if self.lines.contains(line_id) {
                    // attach_root cannot fail here; the word was just inserted
                    let _ = self.lines.attach(line_id, id);
                }
            }
        }
    }
}
