//! Math input surface capability and its change inbox.
//!
//! A [`MathInputSurface`] is a narrow view of a third-party math input
//! widget. Surfaces report user edits through a callback registered once at
//! construction; the coordinator hands them a callback that only enqueues
//! into a [`SurfaceInbox`], and applies queued changes when the host pumps
//! it. No surface callback ever mutates the document directly.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::types::BlockId;

/// Imperative control over a math input widget.
pub trait MathInputSurface {
    /// Replace the widget content.
    fn set_value(&mut self, value: &str);

    /// Current widget content.
    fn value(&self) -> String;

    fn focus(&mut self);

    fn blur(&mut self);

    /// Show the on-screen input aid (virtual keyboard).
    fn show_input_aid(&mut self);

    fn hide_input_aid(&mut self);

    /// Register the change callback. Fires with the full value on every
    /// user-driven change.
    fn on_change(&mut self, callback: Box<dyn FnMut(String)>);
}

/// A change reported by a surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Changed { id: BlockId, value: String },
}

/// Single-threaded FIFO of surface events.
///
/// Cloning shares the queue.
#[derive(Clone, Debug, Default)]
pub struct SurfaceInbox {
    queue: Rc<RefCell<VecDeque<SurfaceEvent>>>,
}

impl SurfaceInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: SurfaceEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<SurfaceEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Build the change callback for the surface of block `id`.
    pub fn sender_for(&self, id: BlockId) -> Box<dyn FnMut(String)> {
        let inbox = self.clone();
        Box::new(move |value| inbox.push(SurfaceEvent::Changed { id, value }))
    }
}
