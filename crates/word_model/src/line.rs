//! Text line - a baseline that root words attach to

use crate::{LineId, NodeId};
use serde::{Deserialize, Serialize};

/// A baseline on a page.
///
/// `attached` is semantically a set; insertion order is kept only so that
/// snapshots serialize deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub id: LineId,
    pub page: u32,
    pub y: f32,
    #[serde(default)]
    pub attached: Vec<NodeId>,
}

impl TextLine {
    /// Create a new line on a page
    pub fn new(page: u32, y: f32) -> Self {
        Self {
            id: LineId::new(),
            page,
            y,
            attached: Vec::new(),
        }
    }

    /// Whether any word is attached
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Whether a specific root is attached
    pub fn has_attached(&self, id: NodeId) -> bool {
        self.attached.contains(&id)
    }
}
