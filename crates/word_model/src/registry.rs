//! Baseline registry - per-document store of text lines

use crate::{LineId, NodeId, Result, TextLine, WordModelError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All text lines of the current document, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineRegistry {
    lines: HashMap<LineId, TextLine>,
}

impl LineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new line on a page
    pub fn add_line(&mut self, page: u32, y: f32) -> LineId {
        let line = TextLine::new(page, y);
        let id = line.id;
        self.lines.insert(id, line);
        id
    }

    /// Insert a pre-built line, preserving its id (document rebuild)
    pub fn insert(&mut self, line: TextLine) {
        self.lines.insert(line.id, line);
    }

    /// Remove an empty line.
    ///
    /// `LineNotEmpty` is surfaced so the caller can warn the user.
    pub fn remove_line(&mut self, id: LineId) -> Result<TextLine> {
        if self.lines.get(&id).is_some_and(|line| !line.is_empty()) {
            return Err(WordModelError::LineNotEmpty(id.as_uuid()));
        }
        self.lines
            .remove(&id)
            .ok_or(WordModelError::LineNotFound(id.as_uuid()))
    }

    /// Attach a root word to a line, detaching it from any prior line first.
    /// Attachment is exclusive.
    pub fn attach(&mut self, line_id: LineId, root: NodeId) -> Result<()> {
        if !self.lines.contains_key(&line_id) {
            return Err(WordModelError::LineNotFound(line_id.as_uuid()));
        }
        self.detach(root);
        if let Some(line) = self.lines.get_mut(&line_id) {
            if !line.has_attached(root) {
                line.attached.push(root);
            }
        }
        Ok(())
    }

    /// Detach a root from whichever line holds it, if any
    pub fn detach(&mut self, root: NodeId) {
        for line in self.lines.values_mut() {
            line.attached.retain(|id| *id != root);
        }
    }

    /// The line a root is attached to
    pub fn line_of(&self, root: NodeId) -> Option<LineId> {
        self.lines
            .values()
            .find(|line| line.has_attached(root))
            .map(|line| line.id)
    }

    /// Get a line by id
    pub fn line(&self, id: LineId) -> Option<&TextLine> {
        self.lines.get(&id)
    }

    /// Whether a line exists
    pub fn contains(&self, id: LineId) -> bool {
        self.lines.contains_key(&id)
    }

    /// Iterate over all lines
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.values()
    }

    /// Iterate over the lines of one page (unsorted; queries scan the set)
    pub fn lines_on_page(&self, page: u32) -> impl Iterator<Item = &TextLine> + '_ {
        self.lines.values().filter(move |line| line.page == page)
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
