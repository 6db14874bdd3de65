//! DOM event wiring and event handlers exposed to JavaScript.
//!
//! When mounted, the editor listens on its own container and routes events
//! by the `data-block-id` of the element they came from. Hosts that render
//! blocks themselves can call `handleKeydown` and `executeAction` directly.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use mathblock_editor_browser::key_press;
use mathblock_editor_core::{BlockId, BlockKind, EditorAction, KeyOutcome, KeyPress};

use crate::editor::{JsEditor, Shared};

/// Result of handling an event.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled, call preventDefault.
    Handled,
    /// Event should pass through to browser.
    PassThrough,
}

impl From<KeyOutcome> for EventResult {
    fn from(r: KeyOutcome) -> Self {
        match r {
            KeyOutcome::Handled => EventResult::Handled,
            KeyOutcome::PassThrough => EventResult::PassThrough,
        }
    }
}

#[wasm_bindgen]
impl JsEditor {
    /// Handle keydown on the input of block `block_id`.
    ///
    /// Returns whether to preventDefault.
    #[wasm_bindgen(js_name = handleKeydown)]
    pub fn handle_keydown(
        &self,
        block_id: u64,
        key: &str,
        ctrl: bool,
        alt: bool,
        shift: bool,
        meta: bool,
    ) -> EventResult {
        let press = KeyPress {
            key: key.to_owned(),
            ctrl,
            alt,
            shift,
            meta,
        };
        self.shared
            .run(|editor| editor.handle_key(BlockId(block_id), &press))
            .map(EventResult::from)
            .unwrap_or(EventResult::PassThrough)
    }
}

fn target_element(event: &web_sys::Event) -> Option<web_sys::Element> {
    event.target()?.dyn_into::<web_sys::Element>().ok()
}

fn block_id_of(element: &web_sys::Element) -> Option<BlockId> {
    let holder = element.closest("[data-block-id]").ok()??;
    holder
        .get_attribute("data-block-id")?
        .parse()
        .ok()
        .map(BlockId)
}

/// Attach delegated listeners to the editor container.
///
/// Clicks on `data-action` buttons run that action for their block; other
/// clicks on a block that is not being edited activate it.
pub(crate) fn attach_listeners(shared: &Rc<Shared>, container: &web_sys::Element) -> Vec<EventListener> {
    let mut listeners = Vec::with_capacity(5);

    let weak = Rc::downgrade(shared);
    listeners.push(EventListener::new(container, "click", move |event| {
        let Some(el) = target_element(event) else {
            return;
        };
        let Some(id) = block_id_of(&el) else {
            return;
        };
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let action = el
            .closest("[data-action]")
            .ok()
            .flatten()
            .and_then(|button| button.get_attribute("data-action"));
        match action.as_deref() {
            Some("done") => shared.dispatch(EditorAction::Done { id }),
            Some("insert-text") => shared.dispatch(EditorAction::InsertAfter {
                anchor: id,
                kind: BlockKind::Text,
            }),
            Some("insert-math") => shared.dispatch(EditorAction::InsertAfter {
                anchor: id,
                kind: BlockKind::Math,
            }),
            _ if el.closest(".mb-editing").ok().flatten().is_none() => {
                shared.dispatch(EditorAction::Activate { id })
            }
            _ => {}
        }
    }));

    // Pressing a block button must not blur the input being edited, or an
    // empty text block would be dropped before its button is clicked.
    listeners.push(EventListener::new_with_options(
        container,
        "mousedown",
        EventListenerOptions::enable_prevent_default(),
        |event| {
            let on_button = target_element(event)
                .and_then(|el| el.closest("[data-action]").ok().flatten())
                .is_some();
            if on_button {
                event.prevent_default();
            }
        },
    ));

    let weak = Rc::downgrade(shared);
    listeners.push(EventListener::new(container, "input", move |event| {
        let Some(textarea) = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            // Math fields report through their surface.
            return;
        };
        let (Some(id), Some(shared)) = (block_id_of(&textarea), weak.upgrade()) else {
            return;
        };
        shared.dispatch(EditorAction::Input {
            id,
            text: textarea.value(),
        });
    }));

    let weak = Rc::downgrade(shared);
    listeners.push(EventListener::new(container, "focusout", move |event| {
        let Some(textarea) = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let (Some(id), Some(shared)) = (block_id_of(&textarea), weak.upgrade()) else {
            return;
        };
        shared.dispatch(EditorAction::Blur { id });
    }));

    let weak = Rc::downgrade(shared);
    listeners.push(EventListener::new_with_options(
        container,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            if key_event.is_composing() {
                return;
            }
            let Some(id) = target_element(event).as_ref().and_then(block_id_of) else {
                return;
            };
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let press = key_press(key_event);
            let handled = shared
                .run(|editor| editor.handle_key(id, &press))
                .is_some_and(|outcome| outcome.is_handled());
            if handled {
                event.prevent_default();
            }
        },
    ));

    listeners
}
