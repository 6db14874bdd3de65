//! Math blocks to MathML, with an escaped fallback for sources that fail to parse.

use pulldown_cmark_escape::{FmtWriter, escape_html};
use pulldown_latex::{
    Parser, Storage, config::DisplayMode, config::RenderConfig, mathml::push_mathml,
};

/// Outcome of rendering one math block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MathResult {
    /// MathML markup.
    Success(String),
    /// Fallback HTML plus what went wrong.
    Error {
        html: String,
        message: String,
        source: String,
    },
}

impl MathResult {
    /// HTML to display, whichever way rendering went.
    pub fn html(&self) -> &str {
        match self {
            MathResult::Success(mathml) => mathml,
            MathResult::Error { html, .. } => html,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MathResult::Error { .. })
    }
}

/// Render one math block's LaTeX (no `$$` delimiters) to MathML.
///
/// `display_mode` picks block layout over inline. Never panics: parse or
/// write failures come back as [`MathResult::Error`] with escaped fallback
/// HTML showing the raw source.
pub fn render_math(latex: &str, display_mode: bool) -> MathResult {
    let storage = Storage::new();
    let events: Vec<_> = Parser::new(latex, &storage).collect();

    let parse_errors: Vec<String> = events
        .iter()
        .filter_map(|event| event.as_ref().err())
        .map(ToString::to_string)
        .collect();
    if !parse_errors.is_empty() {
        return render_error(latex, parse_errors.join("; "), display_mode);
    }

    let config = RenderConfig {
        display_mode: if display_mode {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        },
        ..Default::default()
    };
    let mut mathml = String::new();
    match push_mathml(&mut mathml, events.into_iter(), config) {
        Ok(()) => MathResult::Success(mathml),
        Err(e) => render_error(latex, e.to_string(), display_mode),
    }
}

fn render_error(latex: &str, message: String, display_mode: bool) -> MathResult {
    tracing::debug!(%latex, %message, "math render failed");
    MathResult::Error {
        html: format_error_html(latex, &message, display_mode),
        message,
        source: latex.to_owned(),
    }
}

/// Fallback markup: the raw source in `<code>`, the parser message as a tooltip.
fn format_error_html(latex: &str, error: &str, display_mode: bool) -> String {
    let mode_class = if display_mode {
        "math-display"
    } else {
        "math-inline"
    };
    let mut html = format!(r#"<span class="math math-error {mode_class}" title=""#);
    let _ = escape_html(FmtWriter(&mut html), error);
    html.push_str(r#"">Error rendering equation: <code>"#);
    let _ = escape_html(FmtWriter(&mut html), latex);
    html.push_str("</code></span>");
    html
}
