//! Text-line history operations

use crate::{HistoryOp, OpContext, OpKind, Result};
use word_model::{DocumentSession, LineId, TextLine};

/// Add a baseline to a page.
#[derive(Debug, Clone, Copy)]
pub struct AddLine {
    pub id: LineId,
    pub page: u32,
    pub y: f32,
}

impl AddLine {
    pub fn new(page: u32, y: f32) -> Self {
        Self {
            id: LineId::new(),
            page,
            y,
        }
    }
}

impl HistoryOp for AddLine {
    fn apply(&self, session: &mut DocumentSession, _ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let mut line = TextLine::new(self.page, self.y);
        line.id = self.id;
        session.lines.insert(line);
        Ok(Box::new(DeleteLine { id: self.id }))
    }

    fn kind(&self) -> OpKind {
        OpKind::AddLine
    }

    fn display_name(&self) -> &str {
        "Add Line"
    }
}

/// Delete an empty baseline.
///
/// `LineNotEmpty` is surfaced so the UI can warn instead of silently
/// refusing.
#[derive(Debug, Clone, Copy)]
pub struct DeleteLine {
    pub id: LineId,
}

impl HistoryOp for DeleteLine {
    fn apply(&self, session: &mut DocumentSession, _ctx: &OpContext<'_>) -> Result<Box<dyn HistoryOp>> {
        let line = session.lines.remove_line(self.id)?;
        Ok(Box::new(AddLine {
            id: line.id,
            page: line.page,
            y: line.y,
        }))
    }

    fn kind(&self) -> OpKind {
        OpKind::DeleteLine
    }

    fn display_name(&self) -> &str {
        "Delete Line"
    }
}
