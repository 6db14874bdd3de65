//! CLI settings, read from a KDL file.
//!
//! ```kdl
//! standalone true
//! title "Lecture notes"
//! stylesheet "/css/math.css"
//! ```

use std::path::{Path, PathBuf};

use kdl::KdlDocument;
use miette::{IntoDiagnostic, Result, WrapErr};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSettings {
    /// Wrap output in a complete HTML page.
    pub standalone: bool,
    pub title: Option<String>,
    pub stylesheet: Option<String>,
}

impl RenderSettings {
    pub fn from_kdl(source: &str) -> Result<Self> {
        let doc: KdlDocument = source.parse()?;

        let string_arg = |name: &str| -> Option<String> {
            let node = doc.get(name)?;
            node.entries().first()?.value().as_string().map(str::to_owned)
        };
        let standalone = doc
            .get("standalone")
            .and_then(|node| node.entries().first())
            .and_then(|entry| entry.value().as_bool())
            .unwrap_or(false);

        Ok(Self {
            standalone,
            title: string_arg("title"),
            stylesheet: string_arg("stylesheet"),
        })
    }

    /// Load from `explicit`, or from the default location if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        tracing::debug!(path = %path.display(), "loading config");
        let source = std::fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        Self::from_kdl(&source)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mathblock").join("config.kdl"))
}
