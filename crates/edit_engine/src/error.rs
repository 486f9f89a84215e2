//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Invalid operation: {0}")]
    InvalidOp(String),

    #[error("Word model error: {0}")]
    WordModel(#[from] word_model::WordModelError),
}

pub type Result<T> = std::result::Result<T, EditError>;
