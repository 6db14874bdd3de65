//! Editor actions.
//!
//! Platform-agnostic definitions of what the user did to the editor. The
//! `EditorAction` enum is decoupled from how it was triggered (click, blur,
//! keyboard, toolbar button), and is what hosts feed to `execute_action`.

use serde::{Deserialize, Serialize};

use crate::keymap::KeyPress;
use crate::types::{BlockId, BlockKind};

/// All possible editor actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorAction {
    /// Click/tap on a rendered block: enter edit mode and take focus.
    Activate { id: BlockId },

    /// Text input lost focus: commit, or drop the block if it is empty.
    Blur { id: BlockId },

    /// Explicit "Done" on a math block.
    Done { id: BlockId },

    /// New content typed into a block.
    Input { id: BlockId, text: String },

    /// Toolbar insertion after `anchor`.
    InsertAfter { anchor: BlockId, kind: BlockKind },

    /// Delete a block.
    Remove { id: BlockId },

    /// Key press while `focused` holds input focus.
    Key { focused: BlockId, press: KeyPress },
}

/// Result of offering a key press to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The editor acted on the key; the host should prevent its default.
    Handled,
    /// Not an editor key; let the input element handle it.
    PassThrough,
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyOutcome::Handled)
    }
}
