//! Editor coordinator.
//!
//! Owns one [`BlockDocument`] together with the per-block input surfaces,
//! focus routing, keyboard shortcuts and change propagation. Each block runs
//! a two-state machine:
//!
//! ```text
//!   Viewing --activate--> Editing
//!   Editing --done (math) / blur (text)--> Viewing
//!   Editing --blur on empty text with siblings--> removed
//! ```
//!
//! Every operation leaves the sequence fully consistent before the change
//! callback runs, and the callback only fires when the serialized value
//! actually changed.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde::Serialize;
use smol_str::SmolStr;
use web_time::Instant;

use crate::actions::KeyOutcome;
use crate::config::EditorConfig;
use crate::document::BlockDocument;
use crate::error::EditorError;
use crate::keymap::{KeyPress, Keymap, Shortcut};
use crate::platform::EditorPlatform;
use crate::surface::{MathInputSurface, SurfaceEvent, SurfaceInbox};
use crate::types::{BlockId, BlockKind, BlockMode, DeviceClass};

/// How many emitted values are remembered for echo detection.
const ECHO_HISTORY: usize = 8;

/// A focus move waiting for the target input to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub id: BlockId,
    pub delay: Duration,
    pub requested_at: Instant,
}

impl FocusRequest {
    /// Whether the settle delay has elapsed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.requested_at) >= self.delay
    }
}

/// Render-ready snapshot of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub id: BlockId,
    pub dom_id: SmolStr,
    pub kind: BlockKind,
    pub source: String,
    pub mode: BlockMode,
    /// Holds input focus.
    pub focused: bool,
}

/// Orchestrates a block document for one editor widget.
pub struct EditorCoordinator<P: EditorPlatform> {
    doc: BlockDocument,
    platform: P,
    surfaces: HashMap<BlockId, Box<dyn MathInputSurface>>,
    inbox: SurfaceInbox,
    pending_focus: Option<FocusRequest>,
    keymap: Keymap,
    config: EditorConfig,
    device: DeviceClass,
    /// Last value received from, or emitted to, the consumer.
    value: String,
    /// Values emitted since the last external reset, oldest first.
    emitted: VecDeque<String>,
    on_change: Option<Box<dyn FnMut(&str)>>,
}

impl<P: EditorPlatform> EditorCoordinator<P> {
    /// Mount an editor on `value`.
    pub fn new(
        value: &str,
        config: EditorConfig,
        device: DeviceClass,
        platform: P,
    ) -> Result<Self, EditorError> {
        let keymap = config.keymap()?;
        Ok(Self {
            doc: BlockDocument::from_serialized(value),
            platform,
            surfaces: HashMap::new(),
            inbox: SurfaceInbox::new(),
            pending_focus: None,
            keymap,
            config,
            device,
            value: value.to_owned(),
            emitted: VecDeque::with_capacity(ECHO_HISTORY),
            on_change: None,
        })
    }

    /// Register the consumer's change callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    // === Queries ===

    pub fn document(&self) -> &BlockDocument {
        &self.doc
    }

    /// Last known serialized value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    pub fn set_device_class(&mut self, device: DeviceClass) {
        self.device = device;
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn pending_focus(&self) -> Option<&FocusRequest> {
        self.pending_focus.as_ref()
    }

    pub fn has_surface(&self, id: BlockId) -> bool {
        self.surfaces.contains_key(&id)
    }

    /// Placeholder text, only while the document is blank.
    pub fn placeholder(&self) -> Option<&str> {
        self.doc.is_blank().then_some(self.config.placeholder.as_str())
    }

    /// Snapshot of every block for rendering.
    pub fn views(&self) -> Vec<BlockView> {
        let active = self.doc.active();
        self.doc
            .blocks()
            .iter()
            .map(|b| BlockView {
                id: b.id,
                dom_id: b.id.dom_id(),
                kind: b.kind,
                source: b.source.clone(),
                mode: b.mode,
                focused: active == Some(b.id),
            })
            .collect()
    }

    // === Transitions ===

    /// Viewing -> Editing on click/tap, with focus routed to the block.
    pub fn activate(&mut self, id: BlockId) -> bool {
        if let Err(err) = self.doc.set_editing(id, true) {
            tracing::warn!(%err, "activate ignored");
            return false;
        }
        tracing::debug!(%id, "block entered edit mode");
        self.schedule_focus(id);
        true
    }

    /// Text input lost focus.
    ///
    /// An empty text block is removed when it has siblings; otherwise the
    /// block goes back to Viewing.
    pub fn blur(&mut self, id: BlockId) -> bool {
        let Some(block) = self.doc.get(id) else {
            tracing::debug!(%id, "blur on unknown block");
            return false;
        };
        if block.is_math() {
            // Math blocks only leave edit mode through `done`.
            return false;
        }
        if block.is_empty() && self.doc.len() > 1 {
            tracing::debug!(%id, "dropping empty text block on blur");
            return self.remove(id);
        }
        self.leave_editing(id)
    }

    /// Explicit "Done": Editing -> Viewing.
    ///
    /// Text blocks follow the blur rules.
    pub fn done(&mut self, id: BlockId) -> bool {
        match self.doc.get(id).map(|b| b.kind) {
            Some(BlockKind::Math) => self.leave_editing(id),
            Some(BlockKind::Text) => self.blur(id),
            None => {
                tracing::debug!(%id, "done on unknown block");
                false
            }
        }
    }

    /// Replace a block's content with what the user typed.
    pub fn input(&mut self, id: BlockId, text: &str) -> bool {
        if let Err(err) = self.doc.update(id, text) {
            tracing::warn!(%err, "input ignored");
            return false;
        }
        self.sync_value();
        true
    }

    /// Insert an empty block after `anchor` and move focus to it.
    pub fn insert_after(&mut self, anchor: BlockId, kind: BlockKind) -> BlockId {
        let id = self.doc.insert_after(anchor, kind);
        tracing::debug!(%anchor, %id, ?kind, "inserted block");
        self.schedule_focus(id);
        self.sync_value();
        id
    }

    /// Delete a block. Unknown ids are a no-op.
    pub fn remove(&mut self, id: BlockId) -> bool {
        // Dropped without reading back: the content goes away with the block.
        self.surfaces.remove(&id);
        if self.doc.remove(id).is_none() {
            tracing::debug!(%id, "remove on unknown block");
            return false;
        }
        if self.pending_focus.is_some_and(|req| req.id == id) {
            self.pending_focus = None;
        }
        if let Some(fresh) = self.doc.active().filter(|_| self.doc.is_blank()) {
            self.schedule_focus(fresh);
        }
        self.sync_value();
        true
    }

    /// Offer a key press received while `focused` holds input focus.
    pub fn handle_key(&mut self, focused: BlockId, press: &KeyPress) -> KeyOutcome {
        if let Some(shortcut) = self.keymap.resolve(press) {
            let kind = match shortcut {
                Shortcut::InsertMath => BlockKind::Math,
                Shortcut::InsertText => BlockKind::Text,
            };
            self.insert_after(focused, kind);
            return KeyOutcome::Handled;
        }

        if press.is_backspace() && self.backspace_removes(focused) {
            return KeyOutcome::Handled;
        }

        KeyOutcome::PassThrough
    }

    /// Consumer assigned a new value.
    ///
    /// Echoes of values this editor emitted are ignored so in-progress edits
    /// are not clobbered, including a consumer that lags a few changes
    /// behind. Anything else replaces the whole document.
    pub fn set_external_value(&mut self, value: &str) -> bool {
        if value == self.value || self.emitted.iter().any(|v| v == value) {
            return false;
        }
        tracing::debug!("external value replaced document");
        self.surfaces.clear();
        self.pending_focus = None;
        self.inbox.drain();
        self.doc.replace_all(value);
        self.value = value.to_owned();
        self.emitted.clear();
        true
    }

    // === Deferred focus ===

    /// Run the pending focus request now, if any.
    ///
    /// Every math block in edit mode gets its input surface here, including
    /// blocks whose own request was replaced by a later one. Focus only moves
    /// to the request's block; a request whose block was removed or left
    /// edit mode moves nothing.
    pub fn flush_focus(&mut self) -> bool {
        let Some(request) = self.pending_focus.take() else {
            return false;
        };
        self.mount_editing_surfaces();
        let kind = match self.doc.get(request.id) {
            Some(block) if block.is_editing() => block.kind,
            Some(_) => return false,
            None => {
                tracing::debug!(id = %request.id, "deferred focus target is gone");
                return false;
            }
        };

        match kind {
            BlockKind::Text => match self.platform.focus_text(request.id) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(id = %request.id, %err, "could not focus text block");
                    false
                }
            },
            BlockKind::Math => {
                let touch = self.device.is_touch();
                let Some(surface) = self.surfaces.get_mut(&request.id) else {
                    return false;
                };
                surface.focus();
                if touch {
                    surface.show_input_aid();
                }
                true
            }
        }
    }

    /// Run the pending focus request only if its delay has elapsed at `now`.
    pub fn flush_due_focus(&mut self, now: Instant) -> bool {
        match self.pending_focus {
            Some(request) if request.is_due(now) => self.flush_focus(),
            _ => false,
        }
    }

    // === Surfaces ===

    /// Apply queued surface changes. Returns how many were applied.
    pub fn pump_surface_events(&mut self) -> usize {
        let mut applied = 0;
        for event in self.inbox.drain() {
            let SurfaceEvent::Changed { id, value } = event;
            match self.doc.update(id, value) {
                Ok(()) => applied += 1,
                Err(err) => tracing::debug!(%err, "stale surface change dropped"),
            }
        }
        if applied > 0 {
            self.sync_value();
        }
        applied
    }

    /// Tear down every surface and pending request.
    pub fn unmount(&mut self) {
        self.surfaces.clear();
        self.pending_focus = None;
        self.inbox.drain();
    }

    /// Build a surface for each editing math block that lacks one.
    fn mount_editing_surfaces(&mut self) {
        let missing: Vec<(BlockId, String)> = self
            .doc
            .blocks()
            .iter()
            .filter(|b| b.is_math() && b.is_editing() && !self.surfaces.contains_key(&b.id))
            .map(|b| (b.id, b.source.clone()))
            .collect();
        for (id, seed) in missing {
            match self.platform.create_math_surface(id, &seed) {
                Ok(mut surface) => {
                    surface.on_change(self.inbox.sender_for(id));
                    self.surfaces.insert(id, surface);
                }
                Err(err) => {
                    // Block stays in edit mode with a non-functional input.
                    tracing::error!(%id, %err, "math input surface failed to initialize");
                }
            }
        }
    }

    // === Internals ===

    fn leave_editing(&mut self, id: BlockId) -> bool {
        self.pump_surface_events();
        if let Some(mut surface) = self.surfaces.remove(&id) {
            let last = surface.value();
            if self.device.is_touch() {
                surface.hide_input_aid();
            }
            surface.blur();
            if self.doc.get(id).is_some_and(|b| b.source != last) {
                let _ = self.doc.update(id, last);
            }
        }
        if let Err(err) = self.doc.set_editing(id, false) {
            tracing::warn!(%err, "leave edit mode ignored");
            return false;
        }
        tracing::debug!(%id, "block left edit mode");
        self.sync_value();
        true
    }

    fn backspace_removes(&mut self, focused: BlockId) -> bool {
        let Some(block) = self.doc.get(focused) else {
            return false;
        };
        if !block.is_text() || !block.is_empty() || self.doc.len() <= 1 {
            return false;
        }
        let target = self
            .doc
            .previous_id(focused)
            .or_else(|| self.doc.next_id(focused));

        self.remove(focused);
        if let Some(target) = target {
            self.activate(target);
        }
        true
    }

    fn schedule_focus(&mut self, id: BlockId) {
        let delay = match self.doc.get(id).map(|b| b.kind) {
            Some(BlockKind::Math) => self.config.math_focus_delay(),
            _ => self.config.text_focus_delay(),
        };
        self.pending_focus = Some(FocusRequest {
            id,
            delay,
            requested_at: Instant::now(),
        });
    }

    fn sync_value(&mut self) {
        let serialized = self.doc.serialize();
        if serialized == self.value {
            return;
        }
        self.value = serialized;
        if self.emitted.len() == ECHO_HISTORY {
            self.emitted.pop_front();
        }
        self.emitted.push_back(self.value.clone());
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.value);
        }
    }
}
