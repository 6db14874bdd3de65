//! Read-only HTML rendering of `$$`-delimited content.
//!
//! Uses the same segment rule as the editor's parser, so a preview always
//! shows the blocks the editor would show. A math segment that fails to
//! render only affects its own output.

use std::fmt::Write;

use mathblock_editor_core::{BlockKind, ContentBlock, segments};
use pulldown_cmark_escape::{FmtWriter, escape_html_body_text};

use crate::cache::MathCache;
use crate::math::render_math;

/// Render serialized content to an HTML fragment.
pub fn render_preview(serialized: &str) -> String {
    let mut out = String::with_capacity(serialized.len() * 2);
    push_preview(&mut out, serialized, None);
    out
}

/// Same as [`render_preview`], sharing math renders through `cache`.
pub fn render_preview_cached(serialized: &str, cache: &MathCache) -> String {
    let mut out = String::with_capacity(serialized.len() * 2);
    push_preview(&mut out, serialized, Some(cache));
    out
}

/// Append the preview of `serialized` to `out`.
pub fn push_preview(out: &mut String, serialized: &str, cache: Option<&MathCache>) {
    for seg in segments(serialized).filter(|s| !s.is_blank()) {
        push_segment(out, seg.kind, seg.content, cache);
    }
}

/// HTML for a single block in Viewing mode.
pub fn render_block_html(block: &ContentBlock, cache: Option<&MathCache>) -> String {
    let mut out = String::new();
    push_segment(&mut out, block.kind, &block.source, cache);
    out
}

fn push_segment(out: &mut String, kind: BlockKind, content: &str, cache: Option<&MathCache>) {
    match kind {
        BlockKind::Text => {
            out.push_str(r#"<span class="mb-text" style="white-space: pre-wrap">"#);
            let _ = escape_html_body_text(FmtWriter(&mut *out), content);
            out.push_str("</span>");
        }
        BlockKind::Math => {
            let result = match cache {
                Some(cache) => cache.render(content, true),
                None => render_math(content, true),
            };
            let _ = write!(out, r#"<div class="mb-math">{}</div>"#, result.html());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathblock_editor_core::parse;

    #[test]
    fn test_text_only() {
        insta::assert_snapshot!(render_preview("a < b & c"), @r#"<span class="mb-text" style="white-space: pre-wrap">a &lt; b &amp; c</span>"#);
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(render_preview(""), "");
        assert_eq!(render_preview("$$$$"), "");
    }

    #[test]
    fn test_mixed_content_order() {
        let html = render_preview("Let $$x^2$$ be\nsquare");
        let text1 = html.find("Let ").unwrap();
        let math = html.find(r#"<div class="mb-math"><math"#).unwrap();
        let text2 = html.find("be\nsquare").unwrap();
        assert!(text1 < math && math < text2);
        assert_eq!(html.matches("mb-text").count(), 2);
    }

    #[test]
    fn test_math_is_display_mode() {
        let html = render_preview("$$x$$");
        assert!(html.contains(r#"display="block""#));
    }

    #[test]
    fn test_bad_math_is_local() {
        let html = render_preview(r"$$\frac{1$$ and $$y$$");
        assert!(html.contains("Error rendering equation"));
        assert!(html.contains(r#"<span class="mb-text" style="white-space: pre-wrap"> and </span>"#));
        assert_eq!(html.matches("<math").count(), 1);
    }

    #[test]
    fn test_unmatched_delimiter_is_literal() {
        insta::assert_snapshot!(render_preview("cost $$5"), @r#"<span class="mb-text" style="white-space: pre-wrap">cost $$5</span>"#);
    }

    #[test]
    fn test_block_html_matches_preview() {
        let blocks = parse("one $$z$$ two");
        let cache = MathCache::default();
        let joined: String = blocks
            .iter()
            .map(|b| render_block_html(b, Some(&cache)))
            .collect();
        assert_eq!(joined, render_preview("one $$z$$ two"));
        assert_eq!(render_preview_cached("one $$z$$ two", &cache), joined);
    }
}
