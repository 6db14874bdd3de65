//! JsEditor - the block editor wrapper for JavaScript.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use web_time::Instant;

use mathblock_editor_browser::{BlockRender, BrowserPlatform, detect_platform, sync_block_dom};
use mathblock_editor_core::{
    BlockId, BlockKind, DeviceClass, EditorAction, EditorConfig, EditorCoordinator, FocusRequest,
    execute_action,
};
use mathblock_renderer::{MathCache, render_block_html};
use pulldown_cmark_escape::{FmtWriter, escape_html_body_text};

use crate::actions::parse_action;
use crate::types::JsBlockView;

pub(crate) type Coordinator = EditorCoordinator<BrowserPlatform>;

pub(crate) struct EditorState {
    pub(crate) editor: Coordinator,
    cache: MathCache,
    mounted: bool,
    listeners: Vec<EventListener>,
    /// Last focus request a timer was started for.
    scheduled_focus: Option<FocusRequest>,
}

/// State shared between the JS handle, DOM listeners and timers.
///
/// Listeners and timers only hold `Weak` references.
pub(crate) struct Shared {
    pub(crate) editor_id: String,
    pub(crate) state: RefCell<EditorState>,
    /// Value waiting to be handed to `on_change` once the state borrow ends.
    outbox: Rc<RefCell<Option<String>>>,
    on_change: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    /// Run `f` against the coordinator, then re-render, schedule focus and
    /// notify.
    pub(crate) fn run<R>(self: &Rc<Self>, f: impl FnOnce(&mut Coordinator) -> R) -> Option<R> {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            tracing::debug!("editor busy, call dropped");
            return None;
        };
        let result = f(&mut state.editor);
        self.refresh(&mut state);
        drop(state);
        self.notify_change();
        Some(result)
    }

    /// Execute an action, retrying on the next tick if the editor is busy.
    ///
    /// DOM events can fire synchronously while the editor is mutating the
    /// page (focus moves, element removal); those land here.
    pub(crate) fn dispatch(self: &Rc<Self>, action: EditorAction) {
        if self.state.try_borrow_mut().is_err() {
            let weak = Rc::downgrade(self);
            wasm_bindgen_futures::spawn_local(async move {
                TimeoutFuture::new(0).await;
                if let Some(shared) = weak.upgrade() {
                    shared.dispatch(action);
                }
            });
            return;
        }
        self.run(|editor| execute_action(editor, &action));
    }

    fn schedule_pump(weak: Weak<Self>) {
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(0).await;
            if let Some(shared) = weak.upgrade() {
                shared.run(|editor| editor.pump_surface_events());
            }
        });
    }

    fn refresh(self: &Rc<Self>, state: &mut EditorState) {
        if state.mounted {
            self.render(state);
        }
        self.schedule_focus(state);
    }

    fn render(&self, state: &EditorState) {
        let editor = &state.editor;
        let placeholder = editor.placeholder();
        let renders: Vec<BlockRender> = editor
            .views()
            .iter()
            .map(|view| {
                BlockRender::new(
                    &self.editor_id,
                    view,
                    || viewing_html(editor, &state.cache, view.id, placeholder),
                    placeholder,
                )
            })
            .collect();
        sync_block_dom(&self.editor_id, &renders);
    }

    fn schedule_focus(self: &Rc<Self>, state: &mut EditorState) {
        let Some(request) = state.editor.pending_focus().copied() else {
            return;
        };
        if state.scheduled_focus == Some(request) {
            return;
        }
        state.scheduled_focus = Some(request);

        let weak = Rc::downgrade(self);
        let delay_ms = u32::try_from(request.delay.as_millis()).unwrap_or(u32::MAX);
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(delay_ms.saturating_add(1)).await;
            if let Some(shared) = weak.upgrade() {
                // A superseded request finds a newer, not yet due one and does nothing.
                shared.run(|editor| editor.flush_due_focus(Instant::now()));
            }
        });
    }

    fn notify_change(&self) {
        let Some(value) = self.outbox.borrow_mut().take() else {
            return;
        };
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&value)) {
                tracing::warn!("onChange callback threw: {:?}", e);
            }
        }
    }
}

fn viewing_html(
    editor: &Coordinator,
    cache: &MathCache,
    id: BlockId,
    placeholder: Option<&str>,
) -> String {
    let Some(block) = editor.document().get(id) else {
        return String::new();
    };
    match placeholder {
        Some(text) if block.kind == BlockKind::Text && block.is_empty() => {
            let mut html = String::from(r#"<span class="mb-placeholder">"#);
            let _ = escape_html_body_text(FmtWriter(&mut html), text);
            html.push_str("</span>");
            html
        }
        _ => render_block_html(block, Some(cache)),
    }
}

fn parse_device(device: Option<&str>) -> DeviceClass {
    match device {
        Some("touch") => DeviceClass::Touch,
        Some("pointer") => DeviceClass::Pointer,
        _ => detect_platform().device_class(),
    }
}

/// The editor instance exposed to JavaScript.
#[wasm_bindgen]
pub struct JsEditor {
    pub(crate) shared: Rc<Shared>,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor on a serialized value.
    ///
    /// `config` is an optional `EditorConfig` object; `device` is `"touch"`,
    /// `"pointer"`, or omitted to detect from the browser.
    #[wasm_bindgen(constructor)]
    pub fn new(value: &str, config: JsValue, device: Option<String>) -> Result<JsEditor, JsError> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };
        let device = parse_device(device.as_deref());

        // Generate unique ID for the editor element
        let editor_id = format!("mathblock-editor-{}", js_sys::Math::random().to_bits());
        let cache = MathCache::new(config.math_cache_capacity);

        let mut editor = EditorCoordinator::new(
            value,
            config,
            device,
            BrowserPlatform::new(editor_id.clone()),
        )
        .map_err(|e| JsError::new(&e.to_string()))?;

        let outbox = Rc::new(RefCell::new(None));
        let sink = outbox.clone();
        editor.set_on_change(move |value| {
            *sink.borrow_mut() = Some(value.to_owned());
        });

        let shared = Rc::new(Shared {
            editor_id,
            state: RefCell::new(EditorState {
                editor,
                cache,
                mounted: false,
                listeners: Vec::new(),
                scheduled_focus: None,
            }),
            outbox,
            on_change: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        shared
            .state
            .borrow_mut()
            .editor
            .platform_mut()
            .set_after_input(Some(Rc::new(move || Shared::schedule_pump(weak.clone()))));

        Ok(Self { shared })
    }

    // === Content access ===

    /// Get the serialized value.
    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&self) -> Result<String, JsError> {
        let state = self
            .shared
            .state
            .try_borrow()
            .map_err(|_| JsError::new("editor is busy"))?;
        Ok(state.editor.value().to_owned())
    }

    /// Assign a value from outside. Echoes of the current value are ignored.
    ///
    /// Returns whether the document was replaced.
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, value: &str) -> Result<bool, JsError> {
        self.shared
            .run(|editor| editor.set_external_value(value))
            .ok_or_else(|| JsError::new("editor is busy"))
    }

    /// Set the change callback, called with the new serialized value.
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&self, on_change: Option<js_sys::Function>) {
        *self.shared.on_change.borrow_mut() = on_change;
    }

    /// Get all blocks with their rendered HTML.
    #[wasm_bindgen(js_name = getBlocks)]
    pub fn get_blocks(&self) -> Result<JsValue, JsError> {
        let state = self
            .shared
            .state
            .try_borrow()
            .map_err(|_| JsError::new("editor is busy"))?;
        let blocks: Vec<JsBlockView> = state
            .editor
            .views()
            .into_iter()
            .map(|view| {
                let html = viewing_html(&state.editor, &state.cache, view.id, None);
                JsBlockView::new(view, html)
            })
            .collect();
        serde_wasm_bindgen::to_value(&blocks)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Placeholder text to show, if the document is blank.
    #[wasm_bindgen(js_name = getPlaceholder)]
    pub fn get_placeholder(&self) -> Option<String> {
        let state = self.shared.state.try_borrow().ok()?;
        state.editor.placeholder().map(str::to_owned)
    }

    // === Actions ===

    /// Execute an editor action.
    ///
    /// Automatically re-renders and updates the DOM after the action.
    #[wasm_bindgen(js_name = executeAction)]
    pub fn execute_action(&self, action: JsValue) -> Result<bool, JsError> {
        let action = parse_action(action)?;
        self.shared
            .run(|editor| execute_action(editor, &action))
            .ok_or_else(|| JsError::new("editor is busy"))
    }

    /// Insert a math block after `anchor` and focus it.
    #[wasm_bindgen(js_name = insertMathAfter)]
    pub fn insert_math_after(&self, anchor: u64) -> Option<u64> {
        self.shared
            .run(|editor| editor.insert_after(BlockId(anchor), BlockKind::Math).0)
    }

    /// Insert a text block after `anchor` and focus it.
    #[wasm_bindgen(js_name = insertTextAfter)]
    pub fn insert_text_after(&self, anchor: u64) -> Option<u64> {
        self.shared
            .run(|editor| editor.insert_after(BlockId(anchor), BlockKind::Text).0)
    }

    /// Run any pending focus request now, without waiting for its delay.
    #[wasm_bindgen(js_name = flushFocus)]
    pub fn flush_focus(&self) -> bool {
        self.shared.run(|editor| editor.flush_focus()).unwrap_or(false)
    }

    /// Apply queued math field changes now.
    #[wasm_bindgen(js_name = pumpSurfaceEvents)]
    pub fn pump_surface_events(&self) -> usize {
        self.shared
            .run(|editor| editor.pump_surface_events())
            .unwrap_or(0)
    }

    // === Mounting ===

    /// Mount the editor into a container element.
    ///
    /// Creates the block container inside `container`, renders the blocks
    /// and wires DOM events. The onChange callback is called after each edit.
    #[wasm_bindgen]
    pub fn mount(
        &self,
        container: &HtmlElement,
        on_change: Option<js_sys::Function>,
    ) -> Result<(), JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("No document"))?;

        let editor_el = document
            .create_element("div")
            .map_err(|e| JsError::new(&format!("Failed to create element: {:?}", e)))?;
        editor_el.set_id(&self.shared.editor_id);
        editor_el
            .set_attribute("class", "mathblock-editor")
            .map_err(|e| JsError::new(&format!("Failed to set class: {:?}", e)))?;
        container
            .append_child(&editor_el)
            .map_err(|e| JsError::new(&format!("Failed to append child: {:?}", e)))?;

        if on_change.is_some() {
            self.set_on_change(on_change);
        }

        let listeners = crate::events::attach_listeners(&self.shared, &editor_el);
        {
            let mut state = self
                .shared
                .state
                .try_borrow_mut()
                .map_err(|_| JsError::new("editor is busy"))?;
            state.mounted = true;
            state.listeners = listeners;
        }

        // Initial render
        self.shared.run(|_| ());
        Ok(())
    }

    /// Check if the editor is mounted.
    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.shared
            .state
            .try_borrow()
            .map(|s| s.mounted)
            .unwrap_or(false)
    }

    /// Unmount the editor and clean up.
    #[wasm_bindgen]
    pub fn unmount(&self) {
        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            state.editor.unmount();
            state.listeners.clear();
            state.mounted = false;
            state.scheduled_focus = None;
        }
        if let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.shared.editor_id))
        {
            element.remove();
        }
        *self.shared.on_change.borrow_mut() = None;
    }
}
