//! # Undo/Redo History
//!
//! Snapshot-based history of committed transactions.
//!
//! ## Design
//!
//! - Each committed transaction that changed the tree records its
//!   `before` and `after` snapshots
//! - Undo restores `before` and moves the entry to the redo stack
//! - Redo restores `after` and moves it back
//! - New entries clear the redo stack
//! - Consecutive entries with the same tag merge into one step, so a
//!   resize drag of many frames undoes at once
//!
//! Restoring is done by the caller inside a transaction that skips history.

use folio_document::TreeSnapshot;

/// One undo step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub before: TreeSnapshot,
    pub after: TreeSnapshot,
    /// Merge key for consecutive commits
    pub tag: Option<String>,
}

#[derive(Debug)]
pub struct History {
    /// Most recent last
    undo_stack: Vec<HistoryEntry>,

    /// Most recently undone last
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Whether the top undo entry may still absorb same-tag commits
    open: bool,
}

impl History {
    /// Create a history with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            open: false,
        }
    }

    /// Record a committed change
    pub fn record(&mut self, before: TreeSnapshot, after: TreeSnapshot, tag: Option<String>) {
        let merges = self.open
            && tag.is_some()
            && self.undo_stack.last().map_or(false, |last| last.tag == tag);
        if merges {
            if let Some(last) = self.undo_stack.last_mut() {
                last.after = after;
            }
            return;
        }

        self.open = tag.is_some();
        self.push_entry(HistoryEntry { before, after, tag });
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Pop the next undo step, returning the snapshot to restore
    pub fn undo(&mut self) -> Option<TreeSnapshot> {
        self.open = false;
        let entry = self.undo_stack.pop()?;
        let snapshot = entry.before.clone();
        self.redo_stack.push(entry);
        Some(snapshot)
    }

    /// Pop the next redo step, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<TreeSnapshot> {
        self.open = false;
        let entry = self.redo_stack.pop()?;
        let snapshot = entry.after.clone();
        self.undo_stack.push(entry);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Tag of the next undo step
    pub fn undo_tag(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|entry| entry.tag.as_deref())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open = false;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
