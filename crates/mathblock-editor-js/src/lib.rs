//! WASM bindings for the mathblock editor.
//!
//! Provides an embeddable text + math block editor for JavaScript/TypeScript
//! apps. MathLive must be loaded by the host page for math input.

mod actions;
mod editor;
mod events;
mod types;

pub use actions::*;
pub use editor::*;
pub use events::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}

/// Render serialized content read-only, the way the editor shows it when
/// nothing is being edited.
#[wasm_bindgen(js_name = renderPreview)]
pub fn render_preview(value: &str) -> String {
    mathblock_renderer::render_preview(value)
}
