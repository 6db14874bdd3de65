//! `EditorPlatform` backed by the page DOM.
//!
//! Block inputs are located by the element ids `dom` assigns, so the blocks
//! must have been synced into the container before focus is flushed.

use std::rc::Rc;

use mathblock_editor_core::{BlockId, EditorPlatform, MathInputSurface, PlatformError};
use wasm_bindgen::JsCast;

use crate::dom::{input_element_id, math_slot_id};
use crate::mathfield::{MATHFIELD_TAG, MathfieldElement, MathfieldSurface, mathfield_defined};

pub struct BrowserPlatform {
    editor_id: String,
    after_input: Option<Rc<dyn Fn()>>,
}

impl BrowserPlatform {
    pub fn new(editor_id: impl Into<String>) -> Self {
        Self {
            editor_id: editor_id.into(),
            after_input: None,
        }
    }

    /// Hook run after every math field change, typically to schedule a
    /// `pump_surface_events` on the owning coordinator.
    pub fn with_after_input(mut self, hook: Rc<dyn Fn()>) -> Self {
        self.after_input = Some(hook);
        self
    }

    pub fn set_after_input(&mut self, hook: Option<Rc<dyn Fn()>>) {
        self.after_input = hook;
    }

    pub fn editor_id(&self) -> &str {
        &self.editor_id
    }

    fn document(&self) -> Result<web_sys::Document, PlatformError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PlatformError::from("no document"))
    }

    fn element(&self, id: &str) -> Result<web_sys::Element, PlatformError> {
        self.document()?
            .get_element_by_id(id)
            .ok_or_else(|| PlatformError(format!("element #{id} not found")))
    }
}

impl EditorPlatform for BrowserPlatform {
    fn create_math_surface(
        &mut self,
        id: BlockId,
        seed: &str,
    ) -> Result<Box<dyn MathInputSurface>, PlatformError> {
        if !mathfield_defined() {
            return Err(format!("<{MATHFIELD_TAG}> is not defined; is MathLive loaded?").into());
        }

        let slot = self.element(&math_slot_id(&self.editor_id, &id.dom_id()))?;
        let element = self
            .document()?
            .create_element(MATHFIELD_TAG)
            .map_err(|e| PlatformError(format!("failed to create {MATHFIELD_TAG}: {e:?}")))?;
        slot.set_inner_html("");
        slot.append_child(&element)
            .map_err(|e| PlatformError(format!("failed to mount {MATHFIELD_TAG}: {e:?}")))?;

        let mut surface =
            MathfieldSurface::new(element.unchecked_into::<MathfieldElement>(), self.after_input.clone());
        surface.set_value(seed);
        tracing::debug!(%id, "math field mounted");
        Ok(Box::new(surface))
    }

    fn focus_text(&mut self, id: BlockId) -> Result<(), PlatformError> {
        let input = self
            .element(&input_element_id(&self.editor_id, &id.dom_id()))?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| PlatformError::from("text input is not an HtmlElement"))?;
        input
            .focus()
            .map_err(|e| PlatformError(format!("focus failed: {e:?}")))
    }
}
