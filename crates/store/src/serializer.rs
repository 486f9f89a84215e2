//! Snapshot and restore between sessions and document files

use crate::{
    DocumentFile, FileHeader, LineSnapshot, Result, StoreError, WordSnapshot, FILE_FORMAT,
    FILE_VERSION,
};
use word_model::DocumentSession;

/// Capture a session as a document snapshot.
///
/// Words and lines are sorted by id, so two snapshots of the same document
/// state serialize to the same bytes regardless of mutation history.
pub fn snapshot(session: &DocumentSession) -> DocumentFile {
    let mut words: Vec<WordSnapshot> = session.words.words().map(WordSnapshot::from).collect();
    words.sort_by_key(|w| w.id);
    let mut lines: Vec<LineSnapshot> = session.lines.lines().map(LineSnapshot::from).collect();
    lines.sort_by_key(|l| l.id);
    DocumentFile {
        header: FileHeader::default(),
        words,
        lines,
    }
}

/// Serialize a document file to pretty-printed JSON
pub fn to_json(file: &DocumentFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(file)?)
}

/// Parse a document file from JSON, validating the header
pub fn from_json(json: &str) -> Result<DocumentFile> {
    let file: DocumentFile = serde_json::from_str(json)?;
    if file.header.format != FILE_FORMAT {
        return Err(StoreError::InvalidFormat(file.header.format));
    }
    if file.header.version > FILE_VERSION {
        return Err(StoreError::UnsupportedVersion(file.header.version));
    }
    Ok(file)
}

/// Rebuild a session from a document snapshot.
///
/// Ids are preserved exactly. Line attachment is rebuilt from the roots'
/// `line` fields, in id order; a root referencing a line that is not in the
/// file is an error rather than a silent detach.
pub fn restore(file: DocumentFile) -> Result<DocumentSession> {
    let mut session = DocumentSession::new();
    for line in file.lines {
        session.lines.insert(line.into_line());
    }

    let mut attachments = Vec::new();
    for snapshot in file.words {
        let word = snapshot.into_word();
        if word.is_root() {
            if let Some(line) = word.line {
                attachments.push((line, word.id));
            }
        }
        session.words.insert(word);
    }

    for (line, root) in attachments {
        session
            .attach_root(line, root)
            .map_err(|_| StoreError::DanglingReference(line.to_string()))?;
    }

    tracing::debug!(
        words = session.words.len(),
        lines = session.lines.len(),
        "document restored"
    );
    Ok(session)
}
