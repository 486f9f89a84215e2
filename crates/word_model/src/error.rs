//! Error types for word model operations

use crate::Slot;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WordModelError {
    #[error("Word not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Line not found: {0}")]
    LineNotFound(Uuid),

    #[error("Slot {slot:?} of word {parent} is already occupied")]
    SlotOccupied { parent: Uuid, slot: Slot },

    #[error("Word {0} has a parent and cannot attach to a line")]
    NotARoot(Uuid),

    #[error("Line {0} still has attached words")]
    LineNotEmpty(Uuid),

    #[error("Word {0} is not a valid parent for this child")]
    InvalidParent(Uuid),
}

pub type Result<T> = std::result::Result<T, WordModelError>;
