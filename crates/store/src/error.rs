//! Error types for document persistence

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Not a document file: {0}")]
    InvalidFormat(String),

    #[error("Unsupported document version {0}")]
    UnsupportedVersion(u32),

    #[error("Document references unknown id: {0}")]
    DanglingReference(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
