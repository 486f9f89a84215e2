//! On-disk document format
//!
//! Snapshots carry only persistent state: transient UI fields (selection,
//! navigation memory) never reach disk. Collections are sorted by id so
//! that saving an unchanged document produces byte-identical output.

use serde::{Deserialize, Serialize};
use word_model::{LineId, NodeId, TextLine, WordBox, WordFlags};

/// Magic string identifying a document file
pub const FILE_FORMAT: &str = "interlinear-document";
/// Current format version
pub const FILE_VERSION: u32 = 1;

/// File identification header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub format: String,
    pub version: u32,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            format: FILE_FORMAT.to_string(),
            version: FILE_VERSION,
        }
    }
}

/// Persistent fields of one word box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSnapshot {
    pub id: NodeId,
    pub text: String,
    pub page: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_top: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_bottom: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineId>,
    #[serde(default)]
    pub flags: WordFlags,
}

impl From<&WordBox> for WordSnapshot {
    fn from(word: &WordBox) -> Self {
        Self {
            id: word.id,
            text: word.text.clone(),
            page: word.page,
            x: word.x,
            y: word.y,
            parent: word.parent,
            child_top: word.child_top,
            child_bottom: word.child_bottom,
            line: word.line,
            flags: word.flags,
        }
    }
}

impl WordSnapshot {
    /// Rebuild the in-memory word box. Transient state starts cleared.
    pub fn into_word(self) -> WordBox {
        let mut word = WordBox::new(self.page, self.x, self.y, self.text, self.flags);
        word.id = self.id;
        word.parent = self.parent;
        word.child_top = self.child_top;
        word.child_bottom = self.child_bottom;
        word.line = self.line;
        word
    }
}

/// Persistent fields of one baseline.
///
/// Attachment is not stored; it is rebuilt from the `line` field of the
/// attached roots, which keeps the file free of redundant state that could
/// drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub id: LineId,
    pub page: u32,
    pub y: f32,
}

impl From<&TextLine> for LineSnapshot {
    fn from(line: &TextLine) -> Self {
        Self {
            id: line.id,
            page: line.page,
            y: line.y,
        }
    }
}

impl LineSnapshot {
    /// Rebuild the in-memory line with an empty attachment set
    pub fn into_line(self) -> TextLine {
        let mut line = TextLine::new(self.page, self.y);
        line.id = self.id;
        line
    }
}

/// A complete document snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub header: FileHeader,
    pub words: Vec<WordSnapshot>,
    pub lines: Vec<LineSnapshot>,
}
