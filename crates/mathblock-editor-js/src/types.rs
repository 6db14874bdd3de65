//! Types exposed to JavaScript via wasm-bindgen.

use mathblock_editor_core::{BlockKind, BlockMode, BlockView};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// A block as seen by the host, with its current HTML.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsBlockView {
    pub id: u64,
    pub dom_id: String,
    #[tsify(type = "\"text\" | \"math\"")]
    pub kind: BlockKind,
    #[tsify(type = "\"viewing\" | \"editing\"")]
    pub mode: BlockMode,
    pub source: String,
    /// Rendered content for Viewing mode.
    pub html: String,
    pub focused: bool,
}

impl JsBlockView {
    pub fn new(view: BlockView, html: String) -> Self {
        Self {
            id: view.id.0,
            dom_id: view.dom_id.to_string(),
            kind: view.kind,
            mode: view.mode,
            source: view.source,
            html,
            focused: view.focused,
        }
    }
}
