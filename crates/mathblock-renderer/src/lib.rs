//! mathblock renderer
//!
//! Turns `$$`-delimited content into HTML: LaTeX math becomes MathML via
//! pulldown-latex, text is escaped and rendered whitespace-preserving. Also
//! provides source-located diagnostics for math that fails to render.

pub mod cache;
pub mod diagnostic;
pub mod math;
pub mod page;
pub mod preview;

pub use cache::MathCache;
pub use diagnostic::{CheckReport, MathDiagnostic, check_math};
pub use math::{MathResult, render_math};
pub use page::PreviewPage;
pub use preview::{push_preview, render_block_html, render_preview, render_preview_cached};
