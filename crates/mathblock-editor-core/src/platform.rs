//! Platform abstraction traits for editor operations.
//!
//! These traits define the interface between the editor logic and the host
//! UI (browser DOM, native toolkit, test fakes). The coordinator only talks
//! to the platform through [`EditorPlatform`].

use crate::surface::MathInputSurface;
use crate::types::BlockId;

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Host services needed by the editor coordinator.
pub trait EditorPlatform {
    /// Construct the math input surface for block `id`, seeded with `seed`.
    ///
    /// Called once per stint in edit mode, after the block's input element
    /// has had time to mount.
    fn create_math_surface(
        &mut self,
        id: BlockId,
        seed: &str,
    ) -> Result<Box<dyn MathInputSurface>, PlatformError>;

    /// Move input focus to the text input of block `id`.
    fn focus_text(&mut self, id: BlockId) -> Result<(), PlatformError>;
}

impl<P: EditorPlatform + ?Sized> EditorPlatform for Box<P> {
    fn create_math_surface(
        &mut self,
        id: BlockId,
        seed: &str,
    ) -> Result<Box<dyn MathInputSurface>, PlatformError> {
        (**self).create_math_surface(id, seed)
    }

    fn focus_text(&mut self, id: BlockId) -> Result<(), PlatformError> {
        (**self).focus_text(id)
    }
}
