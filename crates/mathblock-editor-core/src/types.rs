//! Core block types: identifiers, kinds, edit modes and device hints.
//!
//! These types are framework-agnostic. A document is an ordered list of
//! [`ContentBlock`]s; everything else in the crate is built on top of them.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Stable identifier of a block within one document.
///
/// Allocated from a monotonic counter ([`BlockIdGen`]), so an id is never
/// handed to a different block while the document is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl BlockId {
    /// Id suitable for a DOM element (format: `b-{n}`).
    pub fn dom_id(&self) -> SmolStr {
        format_smolstr!("b-{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b-{}", self.0)
    }
}

/// Monotonic block id allocator.
#[derive(Clone, Debug, Default)]
pub struct BlockIdGen {
    next: u64,
}

impl BlockIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next += 1;
        id
    }
}

/// What a block holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Literal text, rendered whitespace-preserving.
    Text,
    /// Math source in the input surface's native (LaTeX) syntax.
    Math,
}

/// Per-block edit state.
///
/// Blocks parsed from existing content start out `Viewing`; freshly
/// inserted blocks start out `Editing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockMode {
    #[default]
    Viewing,
    Editing,
}

/// One addressable unit of document content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Raw payload: literal text, or math source without delimiters.
    pub source: String,
    pub mode: BlockMode,
}

impl ContentBlock {
    pub fn new(id: BlockId, kind: BlockKind, source: impl Into<String>, mode: BlockMode) -> Self {
        Self {
            id,
            kind,
            source: source.into(),
            mode,
        }
    }

    /// Empty block in edit mode, as created by insertion.
    pub fn empty(id: BlockId, kind: BlockKind) -> Self {
        Self::new(id, kind, String::new(), BlockMode::Editing)
    }

    pub fn is_editing(&self) -> bool {
        self.mode == BlockMode::Editing
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }

    pub fn is_math(&self) -> bool {
        self.kind == BlockKind::Math
    }
}

/// Device class hint supplied by the host.
///
/// Decides whether focusing a math block also raises the on-screen input aid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Pointer,
    Touch,
}

impl DeviceClass {
    pub fn is_touch(&self) -> bool {
        matches!(self, DeviceClass::Touch)
    }
}
