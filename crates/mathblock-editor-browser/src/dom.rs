//! Block DOM synchronization.
//!
//! Each block owns one child element of the editor container, keyed by
//! element id. Elements are reused across renders and only have their
//! content replaced when their `data-hash` changes, so live inputs (the
//! text area being typed in, a mounted math field) survive re-renders.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use mathblock_editor_core::{BlockKind, BlockMode, BlockView};
use pulldown_cmark_escape::{FmtWriter, escape_html, escape_html_body_text};
use smol_str::{SmolStr, format_smolstr};

/// Element id of a block's container element.
pub fn block_element_id(editor_id: &str, view: &BlockView) -> SmolStr {
    format_smolstr!("{}-{}", editor_id, view.dom_id)
}

/// Element id of a Text block's textarea.
pub fn input_element_id(editor_id: &str, dom_id: &str) -> SmolStr {
    format_smolstr!("{}-{}-input", editor_id, dom_id)
}

/// Element id of the slot a math field is mounted into.
pub fn math_slot_id(editor_id: &str, dom_id: &str) -> SmolStr {
    format_smolstr!("{}-{}-math", editor_id, dom_id)
}

/// What to put in one block element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRender {
    pub element_id: SmolStr,
    pub block_id: u64,
    pub class: &'static str,
    /// Content is replaced only when this changes.
    pub hash: u64,
    pub html: String,
}

impl BlockRender {
    /// Build the element for `view`.
    ///
    /// `viewing_html` is the rendered content used while the block is not
    /// being edited. Editing blocks get an input shell instead, whose hash
    /// only depends on identity and mode so typing never rebuilds it.
    pub fn new(
        editor_id: &str,
        view: &BlockView,
        viewing_html: impl FnOnce() -> String,
        placeholder: Option<&str>,
    ) -> Self {
        let element_id = block_element_id(editor_id, view);
        let (class, hash, mut html) = match (view.mode, view.kind) {
            (BlockMode::Viewing, kind) => {
                let class = match kind {
                    BlockKind::Text => "mb-block mb-text-block",
                    BlockKind::Math => "mb-block mb-math-block",
                };
                (class, hash_parts(&[view.source.as_str(), "viewing"]), viewing_html())
            }
            (BlockMode::Editing, BlockKind::Text) => (
                "mb-block mb-text-block mb-editing",
                hash_parts(&["editing-text"]),
                text_input_html(editor_id, view, placeholder),
            ),
            (BlockMode::Editing, BlockKind::Math) => (
                "mb-block mb-math-block mb-editing",
                hash_parts(&["editing-math"]),
                math_shell_html(editor_id, view),
            ),
        };
        html.push_str(&insert_controls_html(view));
        Self {
            element_id,
            block_id: view.id.0,
            class,
            hash,
            html,
        }
    }
}

fn hash_parts(parts: &[&str]) -> u64 {
    let mut hasher = DefaultHasher::new();
    parts.hash(&mut hasher);
    hasher.finish()
}

fn text_input_html(editor_id: &str, view: &BlockView, placeholder: Option<&str>) -> String {
    let mut html = format!(
        r#"<textarea class="mb-input" id="{}" data-block-id="{}" rows="1""#,
        input_element_id(editor_id, &view.dom_id),
        view.id.0
    );
    if let Some(placeholder) = placeholder {
        html.push_str(r#" placeholder=""#);
        let _ = escape_html(FmtWriter(&mut html), placeholder);
        html.push('"');
    }
    html.push('>');
    let _ = escape_html_body_text(FmtWriter(&mut html), &view.source);
    html.push_str("</textarea>");
    html
}

fn math_shell_html(editor_id: &str, view: &BlockView) -> String {
    format!(
        concat!(
            r#"<div class="mb-math-slot" id="{slot}"></div>"#,
            r#"<button type="button" class="mb-done" data-action="done" data-block-id="{id}">Done</button>"#,
        ),
        slot = math_slot_id(editor_id, &view.dom_id),
        id = view.id.0,
    )
}

/// Per-block buttons that insert a new block after this one.
///
/// These are the pointer/touch counterpart of the insert shortcuts.
fn insert_controls_html(view: &BlockView) -> String {
    format!(
        concat!(
            r#"<div class="mb-insert">"#,
            r#"<button type="button" class="mb-insert-text" data-action="insert-text" data-block-id="{id}">+ Text</button>"#,
            r#"<button type="button" class="mb-insert-math" data-action="insert-math" data-block-id="{id}">+ Math</button>"#,
            "</div>",
        ),
        id = view.id.0,
    )
}

/// Bring the children of element `editor_id` in line with `blocks`.
///
/// Returns false when the container could not be found.
pub fn sync_block_dom(editor_id: &str, blocks: &[BlockRender]) -> bool {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(editor) = document.get_element_by_id(editor_id) else {
        tracing::warn!(editor_id, "sync_block_dom: editor element not found");
        return false;
    };

    // Build pool of existing DOM elements by ID.
    let mut old_elements: HashMap<String, web_sys::Element> = HashMap::new();
    let mut child_opt = editor.first_element_child();
    while let Some(child) = child_opt {
        child_opt = child.next_element_sibling();
        if let Some(id) = child.get_attribute("id") {
            old_elements.insert(id, child);
        }
    }

    let mut cursor_node: Option<web_sys::Node> = editor.first_element_child().map(|e| e.into());

    for block in blocks {
        let new_hash = format!("{:x}", block.hash);

        if let Some(existing) = old_elements.remove(block.element_id.as_str()) {
            let existing_node: &web_sys::Node = existing.as_ref();
            let at_correct_position = cursor_node.as_ref().is_some_and(|c| c == existing_node);
            if at_correct_position {
                cursor_node = existing.next_element_sibling().map(|e| e.into());
            } else {
                let _ = editor.insert_before(existing_node, cursor_node.as_ref());
            }

            if existing.get_attribute("data-hash").as_deref() != Some(new_hash.as_str()) {
                tracing::trace!(id = %block.element_id, "sync_block_dom: replacing content");
                existing.set_inner_html(&block.html);
                let _ = existing.set_attribute("data-hash", &new_hash);
                let _ = existing.set_attribute("class", block.class);
            }
        } else if let Ok(div) = document.create_element("div") {
            div.set_id(&block.element_id);
            div.set_inner_html(&block.html);
            let _ = div.set_attribute("class", block.class);
            let _ = div.set_attribute("data-hash", &new_hash);
            let _ = div.set_attribute("data-block-id", &block.block_id.to_string());
            let div_node: &web_sys::Node = div.as_ref();
            let _ = editor.insert_before(div_node, cursor_node.as_ref());
        }
    }

    // Remove stale elements.
    for (_, elem) in old_elements {
        elem.remove();
    }

    true
}
