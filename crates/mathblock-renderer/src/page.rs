//! Standalone HTML page around a preview fragment.

use std::fmt::{self, Write};

use pulldown_cmark_escape::{FmtWriter, escape_href, escape_html};

const DEFAULT_CSS: &str = "\
    body { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }
    .mb-math { margin: 0.75rem 0; overflow-x: auto; }
    .math-error { color: #b00020; font-family: monospace; }
";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewPage {
    pub title: Option<String>,
    /// Linked stylesheet. The built-in styles are inlined when unset.
    pub stylesheet: Option<String>,
}

impl PreviewPage {
    /// Wrap a rendered fragment in a complete HTML document.
    pub fn wrap(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len() + 512);
        // Writing to a String doesn't fail
        let _ = self.write_document(&mut out, body);
        out
    }

    fn write_document(&self, out: &mut String, body: &str) -> fmt::Result {
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("  <meta charset=\"utf-8\">\n");
        out.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );

        out.push_str("  <title>");
        escape_html(FmtWriter(&mut *out), self.title.as_deref().unwrap_or("Untitled"))?;
        out.push_str("</title>\n");

        match &self.stylesheet {
            Some(href) => {
                out.push_str("  <link rel=\"stylesheet\" href=\"");
                escape_href(FmtWriter(&mut *out), href)?;
                out.push_str("\">\n");
            }
            None => {
                writeln!(out, "  <style>\n{DEFAULT_CSS}  </style>")?;
            }
        }

        out.push_str("</head>\n<body>\n");
        out.push_str(body);
        out.push_str("\n</body>\n</html>\n");
        Ok(())
    }
}
