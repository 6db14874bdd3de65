//! WASM browser tests for mathblock-editor-js.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

use mathblock_editor_js::{EventResult, JsEditor, render_preview};

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    el.dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn test_value_round_trip() {
    let editor = JsEditor::new("a $$x$$ b", JsValue::UNDEFINED, Some("pointer".into())).unwrap();
    assert_eq!(editor.get_value().unwrap(), "a $$x$$ b");
    assert!(!editor.set_value("a $$x$$ b").unwrap());
    assert!(editor.set_value("other").unwrap());
    assert_eq!(editor.get_value().unwrap(), "other");
}

#[wasm_bindgen_test]
fn test_mount_renders_blocks_and_notifies() {
    let editor = JsEditor::new("a $$x$$ b", JsValue::UNDEFINED, Some("pointer".into())).unwrap();
    let host = container();

    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = seen.clone();
    let callback = Closure::<dyn FnMut(String)>::new(move |v: String| sink.borrow_mut().push(v));
    editor
        .mount(&host, Some(callback.as_ref().unchecked_ref::<js_sys::Function>().clone()))
        .unwrap();
    assert!(editor.is_mounted());

    let root = host.first_element_child().unwrap();
    assert_eq!(root.child_element_count(), 3);

    let last = 2;
    assert_eq!(
        editor.handle_keydown(last, "Enter", true, false, false, false),
        EventResult::Handled
    );
    assert_eq!(root.child_element_count(), 4);
    assert!(seen.borrow().is_empty(), "empty insert does not change the value");

    editor.unmount();
    assert!(!editor.is_mounted());
    assert_eq!(host.child_element_count(), 0);
    drop(callback);
}

fn click(root: &web_sys::Element, selector: &str) {
    root.query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap()
        .click();
}

#[wasm_bindgen_test]
fn test_insert_buttons_add_blocks() {
    let editor = JsEditor::new("a $$x$$ b", JsValue::UNDEFINED, Some("touch".into())).unwrap();
    let host = container();
    editor.mount(&host, None).unwrap();
    let root = host.first_element_child().unwrap();
    assert_eq!(root.child_element_count(), 3);

    click(&root, "[data-action=insert-math]");
    assert_eq!(root.child_element_count(), 4);
    let math = root.children().item(1).unwrap();
    let class = math.get_attribute("class").unwrap();
    assert!(class.contains("mb-math-block") && class.contains("mb-editing"));
    assert_eq!(editor.get_value().unwrap(), "a $$$$$$x$$ b");

    click(&root, "[data-action=insert-text]");
    assert_eq!(root.child_element_count(), 5);
    let text = root.children().item(1).unwrap();
    assert!(text.get_attribute("class").unwrap().contains("mb-text-block"));

    editor.unmount();
}

#[wasm_bindgen_test]
fn test_invalid_action_is_an_error() {
    let editor = JsEditor::new("", JsValue::UNDEFINED, None).unwrap();
    assert!(editor.execute_action(JsValue::from_str("nope")).is_err());
}

#[wasm_bindgen_test]
fn test_preview_export() {
    assert!(render_preview("$$x$$").contains("<math"));
}
