//! Undo/redo history.
//!
//! The host commits a snapshot of the whole document *before* every change;
//! undo swaps the live document with the top snapshot. Snapshots are the
//! document's MessagePack encoding.
//!
//! Drag gestures are batched: the document is captured once when the
//! gesture begins and, if anything changed by the time it ends, pushed as a
//! single undo step. Commits inside a batch are absorbed.

use pc_core::document::Document;
use pc_core::error::DocumentError;

#[derive(Debug, Clone)]
struct Snapshot {
    bytes: Vec<u8>,
    description: String,
}

/// Snapshot stack with batch grouping.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Document captured when the outermost batch began.
    batch_snapshot: Option<Snapshot>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    fn push_undo(&mut self, snap: Snapshot) {
        self.undo_stack.push(snap);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Record `doc` as the state to return to, before mutating it.
    pub fn commit(&mut self, doc: &Document, description: &str) -> Result<(), DocumentError> {
        if self.batch_depth > 0 {
            return Ok(());
        }
        log::debug!("history: commit `{description}`");
        let bytes = doc.snapshot()?;
        self.push_undo(Snapshot {
            bytes,
            description: description.to_string(),
        });
        Ok(())
    }

    /// Start a gesture. Nested calls only bump the depth.
    pub fn begin_batch(&mut self, doc: &Document, description: &str) -> Result<(), DocumentError> {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(Snapshot {
                bytes: doc.snapshot()?,
                description: description.to_string(),
            });
        }
        self.batch_depth += 1;
        Ok(())
    }

    /// End a gesture. When the outermost batch closes and the document
    /// changed, one undo step is pushed.
    pub fn end_batch(&mut self, doc: &Document) -> Result<(), DocumentError> {
        if self.batch_depth == 0 {
            return Ok(());
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return Ok(());
        }
        if let Some(before) = self.batch_snapshot.take()
            && before.bytes != doc.snapshot()?
        {
            log::debug!("history: batch `{}`", before.description);
            self.push_undo(before);
        }
        Ok(())
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Restore the previous state into `doc`. Returns the undone step's
    /// description, or `None` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Result<Option<String>, DocumentError> {
        let Some(snap) = self.undo_stack.pop() else {
            return Ok(None);
        };
        let current = Snapshot {
            bytes: doc.snapshot()?,
            description: snap.description.clone(),
        };
        *doc = Document::restore(&snap.bytes)?;
        self.redo_stack.push(current);
        Ok(Some(snap.description))
    }

    /// Re-apply the last undone step.
    pub fn redo(&mut self, doc: &mut Document) -> Result<Option<String>, DocumentError> {
        let Some(snap) = self.redo_stack.pop() else {
            return Ok(None);
        };
        let current = Snapshot {
            bytes: doc.snapshot()?,
            description: snap.description.clone(),
        };
        *doc = Document::restore(&snap.bytes)?;
        self.undo_stack.push(current);
        Ok(Some(snap.description))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}
