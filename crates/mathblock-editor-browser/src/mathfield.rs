//! `MathInputSurface` over a MathLive `<math-field>` element.
//!
//! MathLive has to be loaded by the host page; the element is only usable
//! once the `math-field` custom element is defined.

use std::rc::Rc;

use gloo_events::EventListener;
use mathblock_editor_core::MathInputSurface;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Tag name MathLive registers.
pub const MATHFIELD_TAG: &str = "math-field";

// === MathLive bindings ===

#[wasm_bindgen]
extern "C" {
    /// The `<math-field>` custom element.
    #[wasm_bindgen(extends = web_sys::HtmlElement, extends = web_sys::Element, extends = web_sys::Node, extends = web_sys::EventTarget)]
    #[derive(Clone, Debug)]
    pub type MathfieldElement;

    /// Content as LaTeX.
    #[wasm_bindgen(method, getter, structural)]
    pub fn value(this: &MathfieldElement) -> String;

    #[wasm_bindgen(method, js_name = setValue)]
    pub fn set_value(this: &MathfieldElement, value: &str);

    /// The global `mathVirtualKeyboard`.
    pub type VirtualKeyboard;

    #[wasm_bindgen(method)]
    pub fn show(this: &VirtualKeyboard);

    #[wasm_bindgen(method)]
    pub fn hide(this: &VirtualKeyboard);
}

fn virtual_keyboard() -> Option<VirtualKeyboard> {
    let kb = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mathVirtualKeyboard"))
        .ok()?;
    if kb.is_undefined() || kb.is_null() {
        return None;
    }
    Some(kb.unchecked_into())
}

/// Whether MathLive has registered its custom element.
pub fn mathfield_defined() -> bool {
    web_sys::window()
        .map(|w| w.custom_elements().get(MATHFIELD_TAG))
        .is_some_and(|ctor| !ctor.is_undefined())
}

pub struct MathfieldSurface {
    element: MathfieldElement,
    listener: Option<EventListener>,
    /// Called after each change is handed to the coordinator's callback.
    after_input: Option<Rc<dyn Fn()>>,
}

impl MathfieldSurface {
    pub fn new(element: MathfieldElement, after_input: Option<Rc<dyn Fn()>>) -> Self {
        Self {
            element,
            listener: None,
            after_input,
        }
    }

    pub fn element(&self) -> &MathfieldElement {
        &self.element
    }
}

impl MathInputSurface for MathfieldSurface {
    fn set_value(&mut self, value: &str) {
        self.element.set_value(value);
    }

    fn value(&self) -> String {
        self.element.value()
    }

    fn focus(&mut self) {
        if let Err(e) = self.element.focus() {
            tracing::warn!("math field focus failed: {:?}", e);
        }
    }

    fn blur(&mut self) {
        if let Err(e) = self.element.blur() {
            tracing::warn!("math field blur failed: {:?}", e);
        }
    }

    fn show_input_aid(&mut self) {
        match virtual_keyboard() {
            Some(kb) => kb.show(),
            None => tracing::debug!("mathVirtualKeyboard not available"),
        }
    }

    fn hide_input_aid(&mut self) {
        if let Some(kb) = virtual_keyboard() {
            kb.hide();
        }
    }

    fn on_change(&mut self, mut callback: Box<dyn FnMut(String)>) {
        let element = self.element.clone();
        let after_input = self.after_input.clone();
        // Replacing drops (and detaches) any previous listener.
        self.listener = Some(EventListener::new(&self.element, "input", move |_event| {
            callback(element.value());
            if let Some(after) = &after_input {
                after();
            }
        }));
    }
}

impl Drop for MathfieldSurface {
    fn drop(&mut self) {
        self.listener.take();
        self.element.remove();
    }
}
