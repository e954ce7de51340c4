//! Snapshot history for undo/redo of filter commands.
//!
//! Each accepted command commits one [`HistoryEntry`]: the list before, the
//! list after, and the formula rewrites the command caused. Undo restores
//! `before`, redo restores `after`. A fresh commit clears the redo stack.

use crate::list::FilterList;
use crate::rename::CellRewrite;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// e.g. `EDIT_GLOBAL_FILTER(f2)`
    pub description: String,
    pub before: FilterList,
    pub after: FilterList,
    /// Formula rewrites the host accepted while applying the command.
    pub cell_rewrites: Vec<CellRewrite>,
}

#[derive(Debug)]
pub struct SnapshotHistory {
    applied: Vec<HistoryEntry>,
    undone: Vec<HistoryEntry>,
    enabled: bool,
    max_entries: Option<usize>,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self {
            applied: Vec::new(),
            undone: Vec::new(),
            enabled: true,
            max_entries: None,
        }
    }

    /// Keep at most `max` undoable entries; older ones are dropped first.
    pub fn with_max_entries(max: usize) -> Self {
        Self {
            max_entries: Some(max),
            ..Self::new()
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        if !self.enabled {
            return;
        }
        self.applied.push(entry);
        self.undone.clear();
        if let Some(max) = self.max_entries
            && self.applied.len() > max
        {
            let overflow = self.applied.len() - max;
            self.applied.drain(..overflow);
        }
    }

    /// Pop the most recent entry onto the redo stack and return it.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        let entry = self.applied.pop()?;
        self.undone.push(entry);
        self.undone.last()
    }

    /// Re-apply the most recently undone entry and return it.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let entry = self.undone.pop()?;
        self.applied.push(entry);
        self.applied.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.applied
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }

    /// Stop (or resume) recording. Existing entries are kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
