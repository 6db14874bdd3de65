//! Memoized math rendering.
//!
//! Rendering is a pure function of `(source, display_mode)`, so results can
//! be shared across blocks and re-renders. The cache is bounded: when it
//! grows past its capacity it is cleared wholesale.

use dashmap::DashMap;

use crate::math::{MathResult, render_math};

#[derive(Debug)]
pub struct MathCache {
    entries: DashMap<(String, bool), MathResult>,
    capacity: usize,
}

impl MathCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Render `latex`, reusing a previous result for the same input.
    pub fn render(&self, latex: &str, display_mode: bool) -> MathResult {
        let key = (latex.to_owned(), display_mode);
        if let Some(hit) = self.entries.get(&key) {
            return hit.value().clone();
        }

        let result = render_math(latex, display_mode);
        if self.entries.len() >= self.capacity {
            tracing::trace!(capacity = self.capacity, "math cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(key, result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for MathCache {
    fn default() -> Self {
        Self::new(256)
    }
}
