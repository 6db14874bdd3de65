//! Source-located reports for math that fails to render.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use mathblock_editor_core::{BlockKind, segments};

use crate::math::{MathResult, render_math};

/// One math segment that failed to render.
#[derive(Error, Debug, Diagnostic)]
#[error("math failed to render: {message}")]
#[diagnostic(code(mathblock::render::math))]
pub struct MathDiagnostic {
    pub message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("in this expression")]
    span: SourceSpan,
    #[help]
    advice: Option<String>,
}

impl MathDiagnostic {
    /// Byte span of the failing math content in the checked input.
    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

/// All failures found in one input.
#[derive(Error, Debug, Diagnostic)]
#[error("{name}: {} math block(s) failed to render", .problems.len())]
#[diagnostic(code(mathblock::check))]
pub struct CheckReport {
    pub name: String,
    #[related]
    pub problems: Vec<MathDiagnostic>,
}

impl CheckReport {
    /// `None` when nothing failed.
    pub fn from_problems(name: impl Into<String>, problems: Vec<MathDiagnostic>) -> Option<Self> {
        if problems.is_empty() {
            None
        } else {
            Some(Self {
                name: name.into(),
                problems,
            })
        }
    }
}

/// Render every non-blank math segment of `serialized` and report failures.
pub fn check_math(serialized: &str, name: &str) -> Vec<MathDiagnostic> {
    segments(serialized)
        .filter(|seg| seg.kind == BlockKind::Math && !seg.is_blank())
        .filter_map(|seg| match render_math(seg.content, true) {
            MathResult::Success(_) => None,
            MathResult::Error { message, .. } => {
                let range = seg.content_span();
                Some(MathDiagnostic {
                    advice: advice_for(seg.content),
                    message,
                    src: NamedSource::new(name, serialized.to_owned()),
                    span: SourceSpan::new(range.start.into(), range.len()),
                })
            }
        })
        .collect()
}

fn advice_for(latex: &str) -> Option<String> {
    let open = latex.matches('{').count();
    let close = latex.matches('}').count();
    if open > close {
        Some(format!("{} unclosed `{{`", open - close))
    } else if close > open {
        Some(format!("{} unmatched `}}`", close - open))
    } else {
        None
    }
}
