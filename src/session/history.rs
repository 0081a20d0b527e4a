use std::collections::HashMap;

use crate::stroke::BrushStroke;

/// A full snapshot of the paintable state at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub color_map: HashMap<String, String>,
    pub brush_strokes: Vec<BrushStroke>,
}

impl HistoryEntry {
    pub fn empty() -> Self {
        Self {
            color_map: HashMap::new(),
            brush_strokes: Vec::new(),
        }
    }
}

/// Linear undo history over state snapshots.
///
/// The history always holds at least one entry (the blank state) and a
/// pointer into it. Undo and redo only move the pointer; pushing after an
/// undo discards the abandoned future before appending.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: vec![HistoryEntry::empty()],
            index: 0,
        }
    }

    /// Appends a snapshot, dropping any entries past the current pointer.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    /// Steps the pointer back and returns the snapshot to restore, or
    /// `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Steps the pointer forward and returns the snapshot to restore, or
    /// `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
