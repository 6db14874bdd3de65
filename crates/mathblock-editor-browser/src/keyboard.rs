//! Keyboard event conversion.

use mathblock_editor_core::KeyPress;

/// Read key and modifier state off a DOM keyboard event.
pub fn key_press(event: &web_sys::KeyboardEvent) -> KeyPress {
    KeyPress {
        key: event.key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    }
}
