//! Editor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::keymap::Keymap;

/// Settings for one editor widget.
///
/// Every field has a default, so hosts can pass a partial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Shown while the document is a single empty text block.
    pub placeholder: String,
    /// Shortcut inserting a math block after the focused block.
    pub insert_math_shortcut: String,
    /// Shortcut inserting a text block after the focused block.
    pub insert_text_shortcut: String,
    /// Delay before focusing a text block's textarea (about one frame).
    pub text_focus_delay_ms: u64,
    /// Delay before focusing a math block; the math widget mounts asynchronously.
    pub math_focus_delay_ms: u64,
    /// Upper bound on memoized math renders kept by a render cache.
    pub math_cache_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: "Type text, or press Mod+M to insert an equation".to_owned(),
            insert_math_shortcut: "Mod+M".to_owned(),
            insert_text_shortcut: "Mod+Enter".to_owned(),
            text_focus_delay_ms: 16,
            math_focus_delay_ms: 150,
            math_cache_capacity: 256,
        }
    }
}

impl EditorConfig {
    /// Build the shortcut table, validating both combos.
    pub fn keymap(&self) -> Result<Keymap, EditorError> {
        Keymap::new(&self.insert_math_shortcut, &self.insert_text_shortcut)
    }

    pub fn text_focus_delay(&self) -> Duration {
        Duration::from_millis(self.text_focus_delay_ms)
    }

    pub fn math_focus_delay(&self) -> Duration {
        Duration::from_millis(self.math_focus_delay_ms)
    }
}
