//! Error types for editor operations.

use thiserror::Error;

use crate::types::BlockId;

/// Errors surfaced by the document model and keymap.
///
/// None of these are fatal to an editing session: the coordinator logs them
/// and carries on with the document unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// Operation targeted a block that is not (or no longer) in the document.
    #[error("block {0} not found")]
    BlockNotFound(BlockId),

    /// A shortcut string could not be parsed.
    #[error("invalid shortcut {combo:?}: {reason}")]
    InvalidShortcut { combo: String, reason: String },
}
