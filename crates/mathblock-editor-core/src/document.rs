//! Block document model.
//!
//! `BlockDocument` is an ordered, never-empty sequence of [`ContentBlock`]s
//! with at most one active (focused) block. The `editing` flag of a block and
//! being the active block are tracked separately: several blocks may be
//! mid-edit while only one holds input focus.

use std::fmt;

use crate::codec;
use crate::error::EditorError;
use crate::types::{BlockId, BlockIdGen, BlockKind, BlockMode, ContentBlock};

/// Ordered block sequence with id allocation and focus tracking.
#[derive(Clone, Debug)]
pub struct BlockDocument {
    blocks: Vec<ContentBlock>,
    ids: BlockIdGen,
    active: Option<BlockId>,
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::from_serialized("")
    }
}

impl BlockDocument {
    /// Build a document from a serialized value.
    pub fn from_serialized(value: &str) -> Self {
        let mut ids = BlockIdGen::new();
        let blocks = codec::parse_with_ids(value, &mut ids);
        Self {
            blocks,
            ids,
            active: None,
        }
    }

    /// Replace every block with the parse of `value`.
    ///
    /// The id allocator keeps running, so ids of dropped blocks are not reused.
    pub fn replace_all(&mut self, value: &str) {
        self.blocks = codec::parse_with_ids(value, &mut self.ids);
        self.active = None;
    }

    // === Queries ===

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// True when the document is a single empty text block (placeholder state).
    pub fn is_blank(&self) -> bool {
        matches!(self.blocks.as_slice(), [only] if only.is_text() && only.is_empty())
    }

    pub fn get(&self, id: BlockId) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.index_of(id).is_some()
    }

    /// The block currently holding input focus, if any.
    pub fn active(&self) -> Option<BlockId> {
        self.active
    }

    pub fn previous_id(&self, id: BlockId) -> Option<BlockId> {
        let idx = self.index_of(id)?;
        idx.checked_sub(1).map(|prev| self.blocks[prev].id)
    }

    pub fn next_id(&self, id: BlockId) -> Option<BlockId> {
        let idx = self.index_of(id)?;
        self.blocks.get(idx + 1).map(|b| b.id)
    }

    /// Serialize the document (`$$`-delimited math).
    pub fn serialize(&self) -> String {
        codec::serialize(&self.blocks)
    }

    // === Mutations ===

    /// Insert an empty block of `kind` right after `anchor`.
    ///
    /// An unknown anchor appends at the end. The new block is in edit mode
    /// and becomes the active block.
    pub fn insert_after(&mut self, anchor: BlockId, kind: BlockKind) -> BlockId {
        let id = self.ids.next_id();
        let block = ContentBlock::empty(id, kind);
        match self.index_of(anchor) {
            Some(idx) => self.blocks.insert(idx + 1, block),
            None => {
                tracing::warn!(%anchor, "insert anchor not found, appending");
                self.blocks.push(block);
            }
        }
        self.active = Some(id);
        id
    }

    /// Replace the source of block `id`.
    pub fn update(&mut self, id: BlockId, source: impl Into<String>) -> Result<(), EditorError> {
        let block = self.get_mut(id)?;
        block.source = source.into();
        Ok(())
    }

    /// Remove block `id`, returning it. Unknown ids are a no-op.
    ///
    /// Removing the last block substitutes a fresh empty text block in edit
    /// mode, which becomes active.
    pub fn remove(&mut self, id: BlockId) -> Option<ContentBlock> {
        let idx = self.index_of(id)?;
        let removed = self.blocks.remove(idx);
        if self.active == Some(id) {
            self.active = None;
        }
        if self.blocks.is_empty() {
            let fresh = self.ids.next_id();
            self.blocks.push(ContentBlock::empty(fresh, BlockKind::Text));
            self.active = Some(fresh);
        }
        Some(removed)
    }

    /// Set the edit flag of block `id`.
    ///
    /// `true` also makes the block active. `false` releases focus if this
    /// block held it; other blocks keep their own edit flags either way.
    pub fn set_editing(&mut self, id: BlockId, editing: bool) -> Result<(), EditorError> {
        let block = self.get_mut(id)?;
        block.mode = if editing {
            BlockMode::Editing
        } else {
            BlockMode::Viewing
        };
        if editing {
            self.active = Some(id);
        } else if self.active == Some(id) {
            self.active = None;
        }
        Ok(())
    }

    /// Drop input focus without touching any edit flag.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    fn get_mut(&mut self, id: BlockId) -> Result<&mut ContentBlock, EditorError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(EditorError::BlockNotFound(id))
    }
}

impl fmt::Display for BlockDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};

    use super::*;

    fn ids(doc: &BlockDocument) -> Vec<BlockId> {
        doc.blocks().iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_insert_after_middle() {
        let mut doc = BlockDocument::from_serialized("A$$B$$C");
        let [a, b, c] = ids(&doc)[..] else {
            panic!("expected three blocks");
        };

        let new = doc.insert_after(b, BlockKind::Math);
        assert_eq!(ids(&doc), vec![a, b, new, c]);

        let block = doc.get(new).unwrap();
        assert!(block.is_editing());
        assert_eq!(block.source, "");
        assert_eq!(block.kind, BlockKind::Math);
        assert_eq!(doc.active(), Some(new));
    }

    #[test]
    fn test_insert_after_unknown_anchor_appends() {
        let mut doc = BlockDocument::from_serialized("A$$B$$");
        let new = doc.insert_after(BlockId(999), BlockKind::Text);
        assert_eq!(ids(&doc).last(), Some(&new));
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_update_unknown_is_error_without_mutation() {
        let mut doc = BlockDocument::from_serialized("abc");
        let before = doc.serialize();
        assert_eq!(
            doc.update(BlockId(77), "x"),
            Err(EditorError::BlockNotFound(BlockId(77)))
        );
        assert_eq!(doc.serialize(), before);
    }

    #[test]
    fn test_remove_only_block_substitutes_empty_text() {
        let mut doc = BlockDocument::from_serialized("abc");
        let only = ids(&doc)[0];

        let removed = doc.remove(only).unwrap();
        assert_eq!(removed.source, "abc");

        assert_eq!(doc.len(), 1);
        let fresh = &doc.blocks()[0];
        assert_eq!(fresh.kind, BlockKind::Text);
        assert_eq!(fresh.source, "");
        assert!(fresh.is_editing());
        assert_ne!(fresh.id, only);
        assert!(doc.is_blank());
    }

    #[test]
    fn test_never_empty_after_repeated_removes() {
        let mut doc = BlockDocument::from_serialized("a$$b$$c$$d$$");
        for _ in 0..10 {
            let first = doc.blocks()[0].id;
            doc.remove(first);
            assert!(doc.len() >= 1);
        }
        assert!(doc.is_blank());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut doc = BlockDocument::from_serialized("a$$b$$");
        assert!(doc.remove(BlockId(1234)).is_none());
        assert_eq!(doc.serialize(), "a$$b$$");
    }

    #[test]
    fn test_editing_and_active_are_separate() {
        let mut doc = BlockDocument::from_serialized("a$$b$$c");
        let [a, b, _] = ids(&doc)[..] else {
            panic!("expected three blocks");
        };

        doc.set_editing(a, true).unwrap();
        doc.set_editing(b, true).unwrap();

        assert_eq!(doc.active(), Some(b));
        assert!(doc.get(a).unwrap().is_editing());
        assert!(doc.get(b).unwrap().is_editing());

        doc.set_editing(a, false).unwrap();
        assert_eq!(doc.active(), Some(b));
        doc.set_editing(b, false).unwrap();
        assert_eq!(doc.active(), None);
    }

    #[test]
    fn test_ids_not_reused_after_replace() {
        let mut doc = BlockDocument::from_serialized("a$$b$$");
        let old = ids(&doc);
        doc.replace_all("c$$d$$");
        for id in ids(&doc) {
            assert!(!old.contains(&id));
        }
    }

    #[test]
    fn test_neighbours() {
        let doc = BlockDocument::from_serialized("a$$b$$c");
        let [a, b, c] = ids(&doc)[..] else {
            panic!("expected three blocks");
        };
        assert_eq!(doc.previous_id(a), None);
        assert_eq!(doc.previous_id(c), Some(b));
        assert_eq!(doc.next_id(a), Some(b));
        assert_eq!(doc.next_id(c), None);
    }

    #[test]
    fn test_display_serializes() {
        let mut doc = BlockDocument::from_serialized("Solve $$x^2$$");
        let last = ids(&doc)[1];
        let t = doc.insert_after(last, BlockKind::Text);
        doc.update(t, " now").unwrap();
        assert_eq!(doc.to_string(), "Solve $$x^2$$ now");
    }

    #[derive(Clone, Debug)]
    enum Step {
        Remove(usize),
        RemoveUnknown,
        Insert(usize, BlockKind),
    }

    impl Arbitrary for Step {
        fn arbitrary(g: &mut Gen) -> Self {
            let at = usize::arbitrary(g);
            match u8::arbitrary(g) % 5 {
                0 => Step::RemoveUnknown,
                1 => Step::Insert(at, BlockKind::Math),
                2 => Step::Insert(at, BlockKind::Text),
                _ => Step::Remove(at),
            }
        }
    }

    quickcheck::quickcheck! {
        fn prop_never_empty_under_edits(initial: String, steps: Vec<Step>) -> bool {
            let mut doc = BlockDocument::from_serialized(&initial);
            for step in steps {
                let current = ids(&doc);
                match step {
                    Step::Remove(at) => {
                        doc.remove(current[at % current.len()]);
                    }
                    Step::RemoveUnknown => {
                        doc.remove(BlockId(u64::MAX));
                    }
                    Step::Insert(at, kind) => {
                        doc.insert_after(current[at % current.len()], kind);
                    }
                }

                let after = ids(&doc);
                let mut unique = after.clone();
                unique.sort();
                unique.dedup();
                let active_ok = doc.active().is_none_or(|id| doc.contains(id));
                if doc.is_empty() || unique.len() != after.len() || !active_ok {
                    return false;
                }
            }
            true
        }
    }
}
