//! EditorAction conversion for JavaScript.
//!
//! Actions arrive as plain objects tagged by `type`, e.g.
//! `{ type: "insertAfter", anchor: 3, kind: "math" }`.

use mathblock_editor_core::EditorAction;
use wasm_bindgen::prelude::*;

/// Parse a JavaScript action object.
pub fn parse_action(value: JsValue) -> Result<EditorAction, JsError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid action: {}", e)))
}
