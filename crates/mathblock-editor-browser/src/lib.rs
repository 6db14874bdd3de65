//! Browser DOM layer for the mathblock editor.
//!
//! Assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: keyed block element sync into the editor container
//! - `mathfield`: `MathInputSurface` over a MathLive `<math-field>`
//! - `browser`: `EditorPlatform` that finds block inputs by element id
//! - `keyboard`: `KeyboardEvent` → `KeyPress`
//! - `platform`: Browser/OS detection, device class hint
//!
//! # Re-exports
//!
//! This crate re-exports `mathblock-editor-core` for convenience, so consumers
//! only need to depend on `mathblock-editor-browser`.

// Re-export core crate
pub use mathblock_editor_core;
pub use mathblock_editor_core::*;

pub mod browser;
pub mod dom;
pub mod keyboard;
pub mod mathfield;
pub mod platform;

pub use browser::BrowserPlatform;
pub use dom::{BlockRender, block_element_id, input_element_id, math_slot_id, sync_block_dom};
pub use keyboard::key_press;
pub use mathfield::MathfieldSurface;
pub use platform::{Platform, detect_platform};
