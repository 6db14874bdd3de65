//! mathblock-editor-core: Pure Rust editing logic for mixed text/math content.
//!
//! This crate provides:
//! - `codec` - the `$$`-delimited serialized format and its segment iterator
//! - `BlockDocument` - ordered, never-empty block sequence
//! - `EditorCoordinator` - edit-mode state machine, focus routing, shortcuts
//!   and change propagation, generic over an `EditorPlatform`
//! - `MathInputSurface` - capability trait for third-party math input widgets

pub mod actions;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod execute;
pub mod keymap;
pub mod platform;
pub mod surface;
pub mod types;

pub use actions::{EditorAction, KeyOutcome};
pub use codec::{MATH_DELIMITER, Segment, Segments, parse, parse_with_ids, segments, serialize};
pub use config::EditorConfig;
pub use coordinator::{BlockView, EditorCoordinator, FocusRequest};
pub use document::BlockDocument;
pub use error::EditorError;
pub use execute::execute_action;
pub use keymap::{KeyCombo, KeyPress, Keymap, Shortcut};
pub use platform::{EditorPlatform, PlatformError};
pub use smol_str::SmolStr;
pub use surface::{MathInputSurface, SurfaceEvent, SurfaceInbox};
pub use types::{BlockId, BlockIdGen, BlockKind, BlockMode, ContentBlock, DeviceClass};
