use std::collections::VecDeque;

use crate::document::Document;

/// Oldest snapshots are evicted beyond this depth.
pub const MAX_SNAPSHOTS: usize = 20;

/// Bounded undo/redo history over full document snapshots.
///
/// Every mutating user action calls [`HistoryStack::record`] with the
/// document as it was *before* the mutation. Deep copies are fine at this
/// document scale; no structural sharing is attempted.
#[derive(Debug, Default)]
pub struct HistoryStack {
    past: VecDeque<Document>,
    future: VecDeque<Document>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the pre-mutation document. Any new action invalidates the
    /// redo stack.
    pub fn record(&mut self, current: &Document) {
        self.past.push_back(current.clone());
        while self.past.len() > MAX_SNAPSHOTS {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Restore the most recent snapshot into `current`, moving the present
    /// state onto the redo stack. Returns `false` (untouched) when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &mut Document) -> bool {
        if let Some(previous) = self.past.pop_back() {
            let now = std::mem::replace(current, previous);
            self.future.push_front(now);
            true
        } else {
            false
        }
    }

    /// Inverse of [`HistoryStack::undo`]. Returns `false` when the redo
    /// stack is empty.
    pub fn redo(&mut self, current: &mut Document) -> bool {
        if let Some(next) = self.future.pop_front() {
            let now = std::mem::replace(current, next);
            self.past.push_back(now);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
