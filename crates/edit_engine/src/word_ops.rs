//! Word-level history operations

use crate::{EditError, HistoryOp, OpContext, OpKind, Result};
use layout_engine::propagate;
use word_model::{DocumentSession, LineId, NodeId, WordBox, WordFlags};

/// Create a root word at a position, optionally attached to a line.
///
/// The id is generated when the gesture builds the op, so redo recreates
/// the identical word.
#[derive(Debug, Clone)]
pub struct AddWord {
    pub id: NodeId,
    pub page: u32,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub flags: WordFlags,
    pub line: Option<LineId>,
}

impl AddWord {
    pub fn new(page: u32, x: f32, y: f32, text: impl Into<String>, flags: WordFlags) -> Self {
        Self {
            id: NodeId::new(),
            page,
            x,
            y,
            text: text.into(),
            flags,
            line: None,
        }
    }
}

impl HistoryOp for AddWord {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let mut word = WordBox::new(self.page, self.x, self.y, self.text.clone(), self.flags);
        word.id = self.id;
        session.words.insert(word);
        if let Some(line) = self.line {
            layout_engine::apply_snap(
                session,
                ctx.geometry,
                ctx.metrics,
                ctx.layout,
                ctx.snap,
                self.id,
                line,
            );
        }
        Ok(Box::new(DeleteFamily { target: self.id }))
    }

    fn kind(&self) -> OpKind {
        OpKind::AddNode
    }

    fn display_name(&self) -> &str {
        "Add Word"
    }
}

/// Delete the whole family containing `target`.
#[derive(Debug, Clone, Copy)]
pub struct DeleteFamily {
    pub target: NodeId,
}

impl HistoryOp for DeleteFamily {
    fn apply(&self, session: &mut DocumentSession, _ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        if !session.words.contains(self.target) {
            return Err(EditError::WordModel(word_model::WordModelError::NodeNotFound(
                self.target.as_uuid(),
            )));
        }
        let boxes = session.delete_family(self.target);
        Ok(Box::new(RestoreFamily { boxes }))
    }

    fn kind(&self) -> OpKind {
        OpKind::DeleteNode
    }

    fn display_name(&self) -> &str {
        "Delete Word"
    }
}

/// Re-insert a deleted family verbatim (the inverse of `DeleteFamily`).
#[derive(Debug, Clone)]
pub struct RestoreFamily {
    pub boxes: Vec<WordBox>,
}

impl HistoryOp for RestoreFamily {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let root = self
            .boxes
            .iter()
            .find(|b| b.is_root())
            .map(|b| b.id)
            .ok_or_else(|| EditError::InvalidOp("restore snapshot has no root".into()))?;
        session.restore_family(self.boxes.clone());
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, root);
        Ok(Box::new(DeleteFamily { target: root }))
    }

    fn kind(&self) -> OpKind {
        OpKind::AddNode
    }

    fn display_name(&self) -> &str {
        "Restore Word"
    }
}

/// Move a root word, including its line attachment change.
#[derive(Debug, Clone, Copy)]
pub struct MoveWord {
    pub root: NodeId,
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub from_line: Option<LineId>,
    pub to_line: Option<LineId>,
}

impl MoveWord {
    /// The same move, reversed
    pub fn reversed(&self) -> Self {
        Self {
            root: self.root,
            from: self.to,
            to: self.from,
            from_line: self.to_line,
            to_line: self.from_line,
        }
    }
}

impl HistoryOp for MoveWord {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        {
            let word = session.words.get_mut(self.root).ok_or_else(|| {
                EditError::WordModel(word_model::WordModelError::NodeNotFound(self.root.as_uuid()))
            })?;
            word.x = self.to.0;
            word.y = self.to.1;
        }
        match self.to_line {
            Some(line) if session.lines.contains(line) => session.attach_root(line, self.root)?,
            _ => session.detach_root(self.root),
        }
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, self.root);
        Ok(Box::new(self.reversed()))
    }

    fn kind(&self) -> OpKind {
        OpKind::MoveNode
    }

    fn display_name(&self) -> &str {
        "Move Word"
    }
}

/// Replace the text of any chain member.
#[derive(Debug, Clone)]
pub struct EditText {
    pub target: NodeId,
    pub text: String,
}

impl HistoryOp for EditText {
    fn apply(&self, session: &mut DocumentSession, ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let prior = session
            .words
            .get(self.target)
            .map(|w| w.text.clone())
            .ok_or_else(|| {
                EditError::WordModel(word_model::WordModelError::NodeNotFound(self.target.as_uuid()))
            })?;
        session.words.set_text(self.target, self.text.clone())?;
        // Text length changes rendered width; geometry follows, not here.
        propagate(session, ctx.geometry, ctx.metrics, ctx.layout, self.target);
        Ok(Box::new(EditText {
            target: self.target,
            text: prior,
        }))
    }

    fn kind(&self) -> OpKind {
        OpKind::EditText
    }

    fn display_name(&self) -> &str {
        "Edit Text"
    }
}
