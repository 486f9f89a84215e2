//! Annotation-level history operations (translation layers in a chain)

use crate::{EditError, HistoryOp, OpContext, OpKind, Result};
use layout_engine::propagate;
use word_model::{DocumentSession, NodeId, Slot, WordBox, WordFlags, WordModelError};

/// Create an annotation box in an empty slot of `parent`.
#[derive(Debug, Clone)]
pub struct AddAnnotation {
    pub id: NodeId,
    pub parent: NodeId,
    pub slot: Slot,
    pub text: String,
}

impl AddAnnotation {
    pub fn new(parent: NodeId, slot: Slot, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent,
            slot,
            text: text.into(),
        }
    }
}

impl HistoryOp for AddAnnotation {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let (page, x, y) = {
            let p = session
                .words
                .get(self.parent)
                .ok_or(WordModelError::NodeNotFound(self.parent.as_uuid()))
                .map_err(EditError::WordModel)?;
            (p.page, p.x, p.y)
        };
        let mut child = WordBox::new(page, x, y, self.text.clone(), WordFlags::default());
        child.id = self.id;
        session.words.insert(child);
        if let Err(err) = session.words.set_parent(self.id, self.parent, self.slot) {
            // Leave no orphan behind when the slot turned out occupied.
            session.words.remove_family(self.id);
            return Err(err.into());
        }
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, self.parent);
        Ok(Box::new(DeleteAnnotation { target: self.id }))
    }

    fn kind(&self) -> OpKind {
        OpKind::AddAnnotation
    }

    fn display_name(&self) -> &str {
        "Add Annotation"
    }
}

/// Remove an annotation box and everything chained beyond it.
///
/// Only ever reached as the inverse of `AddAnnotation`/`RestoreAnnotation`
/// or through replay; user-facing deletion always removes whole families.
#[derive(Debug, Clone, Copy)]
pub struct DeleteAnnotation {
    pub target: NodeId,
}

impl HistoryOp for DeleteAnnotation {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let (parent, slot) = {
            let word = session
                .words
                .get(self.target)
                .ok_or(WordModelError::NodeNotFound(self.target.as_uuid()))
                .map_err(EditError::WordModel)?;
            let parent = word
                .parent
                .ok_or_else(|| EditError::InvalidOp("cannot delete a root as an annotation".into()))?;
            let slot = session
                .words
                .get(parent)
                .and_then(|p| p.slot_of(self.target))
                .ok_or_else(|| EditError::InvalidOp("annotation parent edge is inconsistent".into()))?;
            (parent, slot)
        };
        let boxes = session.words.remove_subtree(self.target);
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, parent);
        Ok(Box::new(RestoreAnnotation { parent, slot, boxes }))
    }

    fn kind(&self) -> OpKind {
        OpKind::DeleteAnnotation
    }

    fn display_name(&self) -> &str {
        "Delete Annotation"
    }
}

/// Re-insert a removed annotation subtree (the inverse of `DeleteAnnotation`).
#[derive(Debug, Clone)]
pub struct RestoreAnnotation {
    pub parent: NodeId,
    pub slot: Slot,
    pub boxes: Vec<WordBox>,
}

impl HistoryOp for RestoreAnnotation {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let sub_root = self
            .boxes
            .first()
            .map(|b| b.id)
            .ok_or_else(|| EditError::InvalidOp("restore snapshot is empty".into()))?;
        for word in &self.boxes {
            session.words.insert(word.clone());
        }
        session.words.set_parent(sub_root, self.parent, self.slot)?;
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, self.parent);
        Ok(Box::new(DeleteAnnotation { target: sub_root }))
    }

    fn kind(&self) -> OpKind {
        OpKind::AddAnnotation
    }

    fn display_name(&self) -> &str {
        "Restore Annotation"
    }
}

/// Re-parent an annotation (and its subtree) into another empty slot.
#[derive(Debug, Clone, Copy)]
pub struct MoveAnnotation {
    pub child: NodeId,
    pub to_parent: NodeId,
    pub to_slot: Slot,
}

impl HistoryOp for MoveAnnotation {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let from_parent = session
            .words
            .get(self.child)
            .and_then(|w| w.parent)
            .ok_or_else(|| EditError::InvalidOp("cannot re-parent a root".into()))?;
        let from_slot = session
            .words
            .get(from_parent)
            .and_then(|p| p.slot_of(self.child))
            .ok_or_else(|| EditError::InvalidOp("annotation parent edge is inconsistent".into()))?;

        session
            .words
            .set_parent(self.child, self.to_parent, self.to_slot)?;
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, from_parent);
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, self.to_parent);

        Ok(Box::new(MoveAnnotation {
            child: self.child,
            to_parent: from_parent,
            to_slot: from_slot,
        }))
    }

    fn kind(&self) -> OpKind {
        OpKind::MoveAnnotation
    }

    fn display_name(&self) -> &str {
        "Move Annotation"
    }
}
