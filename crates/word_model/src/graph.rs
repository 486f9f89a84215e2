//! Word graph - arena storage and family chain operations

use crate::{NodeId, Result, Slot, WordBox, WordFlags, WordModelError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Arena of word boxes indexed by stable id.
///
/// Parent/child fields are plain id lookups, never owning pointers, so
/// family deletion is arena removal plus edge cleanup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordGraph {
    words: HashMap<NodeId, WordBox>,
}

impl WordGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new root word and insert it
    pub fn create_word(
        &mut self,
        page: u32,
        x: f32,
        y: f32,
        text: impl Into<String>,
        flags: WordFlags,
    ) -> NodeId {
        let word = WordBox::new(page, x, y, text, flags);
        let id = word.id;
        self.words.insert(id, word);
        id
    }

    /// Insert a pre-built word box, preserving its id (document rebuild)
    pub fn insert(&mut self, word: WordBox) {
        self.words.insert(word.id, word);
    }

    /// Get a word by id
    pub fn get(&self, id: NodeId) -> Option<&WordBox> {
        self.words.get(&id)
    }

    /// Get a mutable word by id
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut WordBox> {
        self.words.get_mut(&id)
    }

    /// Whether a word exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.words.contains_key(&id)
    }

    /// Number of words in the graph
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over all words
    pub fn words(&self) -> impl Iterator<Item = &WordBox> {
        self.words.values()
    }

    /// Iterate over all family roots
    pub fn roots(&self) -> impl Iterator<Item = &WordBox> {
        self.words.values().filter(|w| w.is_root())
    }

    /// Iterate over family roots on one page
    pub fn roots_on_page(&self, page: u32) -> impl Iterator<Item = &WordBox> + '_ {
        self.roots().filter(move |w| w.page == page)
    }

    /// Create a child annotation in an empty slot of `parent`.
    ///
    /// Returns `SlotOccupied` when the slot is filled; the gesture layer
    /// treats that as a silent no-op.
    pub fn add_child(&mut self, parent: NodeId, slot: Slot, text: impl Into<String>) -> Result<NodeId> {
        let (page, x, y) = {
            let p = self
                .words
                .get(&parent)
                .ok_or(WordModelError::NodeNotFound(parent.as_uuid()))?;
            if p.child(slot).is_some() {
                return Err(WordModelError::SlotOccupied {
                    parent: parent.as_uuid(),
                    slot,
                });
            }
            (p.page, p.x, p.y)
        };

        // Position is provisional; layout propagation derives the real one.
        let mut child = WordBox::new(page, x, y, text, WordFlags::default());
        child.parent = Some(parent);
        let child_id = child.id;
        self.words.insert(child_id, child);
        if let Some(p) = self.words.get_mut(&parent) {
            p.set_child(slot, Some(child_id));
        }
        Ok(child_id)
    }

    /// Re-parent `child` into an empty slot of `parent`.
    ///
    /// The child's subtree rides along. Rejects a parent that lies inside
    /// the child's own subtree, which would close a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId, slot: Slot) -> Result<()> {
        if !self.words.contains_key(&child) {
            return Err(WordModelError::NodeNotFound(child.as_uuid()));
        }
        let target = self
            .words
            .get(&parent)
            .ok_or(WordModelError::NodeNotFound(parent.as_uuid()))?;
        if target.child(slot).is_some() {
            return Err(WordModelError::SlotOccupied {
                parent: parent.as_uuid(),
                slot,
            });
        }
        if child == parent || self.subtree(child).contains(&parent) {
            return Err(WordModelError::InvalidParent(parent.as_uuid()));
        }

        self.detach_child(child)?;
        if let Some(c) = self.words.get_mut(&child) {
            c.parent = Some(parent);
            // Non-roots never hold their own line attachment.
            c.line = None;
        }
        if let Some(p) = self.words.get_mut(&parent) {
            p.set_child(slot, Some(child));
        }
        Ok(())
    }

    /// Remove the parent edge of `child`, making it the root of its subtree.
    pub fn detach_child(&mut self, child: NodeId) -> Result<()> {
        let parent = self
            .words
            .get(&child)
            .ok_or(WordModelError::NodeNotFound(child.as_uuid()))?
            .parent;
        if let Some(parent) = parent {
            if let Some(p) = self.words.get_mut(&parent) {
                if let Some(slot) = p.slot_of(child) {
                    p.set_child(slot, None);
                }
            }
            if let Some(c) = self.words.get_mut(&child) {
                c.parent = None;
            }
        }
        Ok(())
    }

    /// Replace the text of a word.
    ///
    /// Geometry is never touched here; callers re-propagate layout because
    /// text length changes rendered width.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        let w = self
            .words
            .get_mut(&id)
            .ok_or(WordModelError::NodeNotFound(id.as_uuid()))?;
        w.text = text.into();
        Ok(())
    }

    /// Every member of the family containing `id`, in BFS order from `id`.
    ///
    /// Walks parent and both child edges with deduplication, so it
    /// terminates even on a damaged graph and may start at any member.
    pub fn family(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        if self.words.contains_key(&id) {
            queue.push_back(id);
            seen.insert(id);
        }
        while let Some(next) = queue.pop_front() {
            order.push(next);
            let Some(word) = self.words.get(&next) else {
                continue;
            };
            for neighbor in [word.parent, word.child_top, word.child_bottom]
                .into_iter()
                .flatten()
            {
                if self.words.contains_key(&neighbor) && seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        order
    }

    /// The subtree reachable from `id` through child edges only.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        if self.words.contains_key(&id) {
            queue.push_back(id);
            seen.insert(id);
        }
        while let Some(next) = queue.pop_front() {
            order.push(next);
            let Some(word) = self.words.get(&next) else {
                continue;
            };
            for child in [word.child_top, word.child_bottom].into_iter().flatten() {
                if self.words.contains_key(&child) && seen.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        order
    }

    /// The root of the family containing `id`.
    ///
    /// A dangling parent id aborts the walk at the last live word.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        let mut seen = HashSet::new();
        seen.insert(current);
        loop {
            let word = self.words.get(&current)?;
            match word.parent {
                Some(parent) if self.words.contains_key(&parent) && seen.insert(parent) => {
                    current = parent;
                }
                _ => return Some(current),
            }
        }
    }

    /// Detach `id` from its parent and remove its subtree, returning the
    /// removed boxes (subtree root first, its parent edge cleared).
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<WordBox> {
        if self.detach_child(id).is_err() {
            return Vec::new();
        }
        self.subtree(id)
            .into_iter()
            .filter_map(|member| self.words.remove(&member))
            .collect()
    }

    /// Remove the whole family containing `id`, returning the removed boxes.
    ///
    /// The removed boxes keep their edges intact so a deletion can be
    /// undone by re-inserting them verbatim.
    pub fn remove_family(&mut self, id: NodeId) -> Vec<WordBox> {
        self.family(id)
            .into_iter()
            .filter_map(|member| self.words.remove(&member))
            .collect()
    }

    /// Mark every member of a family as selected
    pub fn select_family(&mut self, id: NodeId) {
        for member in self.family(id) {
            if let Some(w) = self.words.get_mut(&member) {
                w.selected = true;
            }
        }
    }

    /// Mark a single box as the individually selected one within its family
    pub fn select_individual(&mut self, id: NodeId) {
        for member in self.family(id) {
            if let Some(w) = self.words.get_mut(&member) {
                w.individually_selected = member == id;
            }
        }
    }

    /// Clear family selection everywhere.
    ///
    /// Each family's individually selected box is kept as navigation
    /// memory, so re-entering the family resumes at the box last visited.
    pub fn deselect_all(&mut self) {
        for w in self.words.values_mut() {
            w.selected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_chain() -> (WordGraph, NodeId, NodeId, NodeId) {
        let mut g = WordGraph::new();
        let root = g.create_word(1, 100.0, 100.0, "logos", WordFlags::default());
        let above = g.add_child(root, Slot::Top, "word").unwrap();
        let below = g.add_child(root, Slot::Bottom, "verbum").unwrap();
        (g, root, above, below)
    }

    #[test]
    fn family_has_exactly_one_root() {
        let (g, root, above, below) = graph_with_chain();
        let family = g.family(below);
        assert_eq!(family.len(), 3);
        let roots: Vec<_> = family
            .iter()
            .filter(|id| g.get(**id).unwrap().is_root())
            .collect();
        assert_eq!(roots, vec![&root]);
        assert_eq!(g.root_of(above), Some(root));
        assert_eq!(g.root_of(below), Some(root));
    }

    #[test]
    fn occupied_slot_is_rejected() {
        let (mut g, root, _, _) = graph_with_chain();
        let err = g.add_child(root, Slot::Top, "again").unwrap_err();
        assert!(matches!(err, WordModelError::SlotOccupied { .. }));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn remove_family_from_any_member() {
        let (mut g, _, above, _) = graph_with_chain();
        let removed = g.remove_family(above);
        assert_eq!(removed.len(), 3);
        assert!(g.is_empty());
    }

    #[test]
    fn deep_chain_traversal_terminates() {
        let mut g = WordGraph::new();
        let root = g.create_word(1, 0.0, 0.0, "root", WordFlags::default());
        let mut current = root;
        for i in 0..20 {
            current = g.add_child(current, Slot::Bottom, format!("layer {i}")).unwrap();
        }
        assert_eq!(g.family(current).len(), 21);
        assert_eq!(g.root_of(current), Some(root));
    }

    #[test]
    fn reparent_moves_subtree_and_clears_line() {
        let mut g = WordGraph::new();
        let a = g.create_word(1, 0.0, 0.0, "a", WordFlags::default());
        let b = g.create_word(1, 50.0, 0.0, "b", WordFlags::default());
        let child = g.add_child(a, Slot::Bottom, "child").unwrap();

        g.set_parent(child, b, Slot::Bottom).unwrap();
        assert_eq!(g.get(a).unwrap().child_bottom, None);
        assert_eq!(g.get(b).unwrap().child_bottom, Some(child));
        assert_eq!(g.get(child).unwrap().parent, Some(b));
        assert_eq!(g.get(child).unwrap().line, None);
        assert_eq!(g.family(b).len(), 2);
        assert_eq!(g.family(a).len(), 1);
    }

    #[test]
    fn reparent_into_own_subtree_is_rejected() {
        let mut g = WordGraph::new();
        let root = g.create_word(1, 0.0, 0.0, "root", WordFlags::default());
        let child = g.add_child(root, Slot::Bottom, "child").unwrap();
        let grandchild = g.add_child(child, Slot::Bottom, "grandchild").unwrap();

        let err = g.set_parent(child, grandchild, Slot::Top).unwrap_err();
        assert!(matches!(err, WordModelError::InvalidParent(_)));
        // Graph unchanged
        assert_eq!(g.get(child).unwrap().parent, Some(root));
        assert_eq!(g.root_of(grandchild), Some(root));
    }

    #[test]
    fn deselecting_keeps_individual_memory() {
        let (mut g, root, above, _) = graph_with_chain();
        g.select_family(root);
        g.select_individual(above);

        g.deselect_all();
        assert!(!g.get(root).unwrap().selected);
        assert!(!g.get(above).unwrap().selected);
        assert!(g.get(above).unwrap().individually_selected);
    }

    #[test]
    fn individual_selection_is_exclusive_within_family() {
        let (mut g, root, above, below) = graph_with_chain();
        g.select_individual(above);
        g.select_individual(below);
        assert!(!g.get(above).unwrap().individually_selected);
        assert!(g.get(below).unwrap().individually_selected);
        assert!(!g.get(root).unwrap().individually_selected);
    }
}
