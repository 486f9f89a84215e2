//! Word box - a single annotation unit in an interlinear chain

use crate::{LineId, NodeId};
use serde::{Deserialize, Serialize};

/// The two child-attachment points a word exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Top,
    Bottom,
}

/// Structural role flags for a word box.
///
/// Chapter and section words are always drag-constrained; headline and
/// page-number words are excluded from translation lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFlags {
    #[serde(default)]
    pub is_chapter: bool,
    #[serde(default)]
    pub is_section: bool,
    #[serde(default)]
    pub is_headline: bool,
    #[serde(default)]
    pub is_page_number: bool,
    #[serde(default)]
    pub is_greek_script: bool,
}

/// A word box in the interlinear chain.
///
/// Position is authoritative only on a root (a box with no parent); the
/// positions of chained annotation boxes are derived by layout propagation.
/// `line` is likewise meaningful only on a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub id: NodeId,
    pub text: String,
    /// Page this word family lives on
    pub page: u32,
    pub x: f32,
    pub y: f32,
    /// Back-reference to the owning parent (None on the family root)
    pub parent: Option<NodeId>,
    /// At most one child stacked above
    pub child_top: Option<NodeId>,
    /// At most one child stacked below
    pub child_bottom: Option<NodeId>,
    /// Baseline attachment; derived on non-roots
    pub line: Option<LineId>,
    pub flags: WordFlags,
    /// Family-level selection
    #[serde(default)]
    pub selected: bool,
    /// Single-box selection inside a selected family
    #[serde(default)]
    pub individually_selected: bool,
    /// Keyboard navigation memory: last left this box upward
    #[serde(default)]
    pub last_entered_from_top: bool,
    /// Keyboard navigation memory: last left this box downward
    #[serde(default)]
    pub last_entered_from_bottom: bool,
}

impl WordBox {
    /// Create a new root word box at a position
    pub fn new(page: u32, x: f32, y: f32, text: impl Into<String>, flags: WordFlags) -> Self {
        Self {
            id: NodeId::new(),
            text: text.into(),
            page,
            x,
            y,
            parent: None,
            child_top: None,
            child_bottom: None,
            line: None,
            flags,
            selected: false,
            individually_selected: false,
            last_entered_from_top: false,
            last_entered_from_bottom: false,
        }
    }

    /// True when this box is a family root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True when dragging is always constrained for this box
    pub fn is_constrained(&self) -> bool {
        self.flags.is_chapter || self.flags.is_section
    }

    /// The child occupying a slot, if any
    pub fn child(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Top => self.child_top,
            Slot::Bottom => self.child_bottom,
        }
    }

    /// Set or clear the child in a slot
    pub fn set_child(&mut self, slot: Slot, child: Option<NodeId>) {
        match slot {
            Slot::Top => self.child_top = child,
            Slot::Bottom => self.child_bottom = child,
        }
    }

    /// Find which slot a child occupies
    pub fn slot_of(&self, child: NodeId) -> Option<Slot> {
        if self.child_top == Some(child) {
            Some(Slot::Top)
        } else if self.child_bottom == Some(child) {
            Some(Slot::Bottom)
        } else {
            None
        }
    }
}
