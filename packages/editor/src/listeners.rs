//! Commit listeners
//!
//! Update listeners see every commit, selection listeners only commits that
//! moved the selection, and the single change listener receives the exported
//! document string.

use folio_document::{Commit, DocumentTree, Selection};

pub type UpdateListener = Box<dyn Fn(&DocumentTree, &Commit)>;
pub type SelectionListener = Box<dyn Fn(Option<Selection>)>;
pub type ChangeListener = Box<dyn Fn(&str)>;

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    pub(crate) update: Vec<(ListenerId, UpdateListener)>,
    pub(crate) selection: Vec<(ListenerId, SelectionListener)>,
    pub(crate) change: Option<(ListenerId, ChangeListener)>,
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub(crate) fn add_update(&mut self, listener: UpdateListener) -> ListenerId {
        let id = self.next_id();
        self.update.push((id, listener));
        id
    }

    pub(crate) fn add_selection(&mut self, listener: SelectionListener) -> ListenerId {
        let id = self.next_id();
        self.selection.push((id, listener));
        id
    }

    /// Replaces any previous change listener
    pub(crate) fn set_change(&mut self, listener: ChangeListener) -> ListenerId {
        let id = self.next_id();
        self.change = Some((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.update.len() + self.selection.len();
        self.update.retain(|(existing, _)| *existing != id);
        self.selection.retain(|(existing, _)| *existing != id);
        let mut removed = before != self.update.len() + self.selection.len();

        if matches!(&self.change, Some((existing, _)) if *existing == id) {
            self.change = None;
            removed = true;
        }
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.update.len() + self.selection.len() + usize::from(self.change.is_some())
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("update", &self.update.len())
            .field("selection", &self.selection.len())
            .field("change", &self.change.is_some())
            .finish()
    }
}
