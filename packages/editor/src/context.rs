//! # Editor Context
//!
//! Everything one editable document owns: its tree, history, listeners and
//! configuration. Command handlers receive the context explicitly.
//!
//! Every mutation goes through [`EditorContext::update`], which opens a
//! transaction, commits it, records history and notifies listeners:
//!
//! ```text
//! update(f) ─▶ begin ─▶ f(&mut txn) ─▶ commit ─┬─▶ history.record (if changed)
//!                                              ├─▶ update listeners
//!                                              ├─▶ selection listeners (if moved)
//!                                              └─▶ change listener(export json)
//! ```

use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::history::History;
use crate::listeners::{ListenerId, Listeners};
use folio_codec::export_string;
use folio_document::{Commit, DocumentTree, Fragment, Selection, Transaction};
use tracing::{debug, info};

/// Transaction lifecycle of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    Idle,
    InTransaction,
}

#[derive(Debug)]
pub struct EditorContext {
    tree: DocumentTree,
    history: History,
    listeners: Listeners,
    config: EditorConfig,
    state: TxnState,
}

impl EditorContext {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            tree: DocumentTree::new(),
            history: History::with_max_levels(config.history_max_levels),
            listeners: Listeners::default(),
            config,
            state: TxnState::Idle,
        }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<Selection> {
        self.tree.selection()
    }

    pub fn state(&self) -> TxnState {
        self.state
    }

    /// Run `f` inside one transaction and commit it
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> R {
        self.state = TxnState::InTransaction;
        let mut txn = self.tree.begin();
        let result = f(&mut txn);
        let commit = txn.commit();
        self.state = TxnState::Idle;

        self.finish(commit);
        result
    }

    fn finish(&mut self, commit: Commit) {
        debug!(
            changed = commit.changed,
            selection_changed = commit.selection_changed,
            repaired = commit.repaired,
            rejected = commit.rejected.len(),
            "Transaction committed"
        );

        if commit.changed && !commit.skip_history {
            self.history.record(
                commit.before.clone(),
                self.tree.snapshot(),
                commit.history_tag.clone(),
            );
        }

        for (_, listener) in &self.listeners.update {
            listener(&self.tree, &commit);
        }
        if commit.selection_changed {
            let selection = self.tree.selection();
            for (_, listener) in &self.listeners.selection {
                listener(selection);
            }
        }
        if let Some((_, listener)) = &self.listeners.change {
            listener(&export_string(&self.tree));
        }
    }

    /// Replace the document with stored content (JSON or legacy text)
    ///
    /// Never fails; unreadable input loads as the minimum document. History
    /// starts over.
    pub fn load(&mut self, input: &str) {
        info!(len = input.len(), "Loading document");
        let fragments = folio_codec::load(input);
        self.replace_document(fragments);
    }

    /// Like [`EditorContext::load`], but rejects unreadable JSON and leaves the
    /// current document untouched
    pub fn try_load(&mut self, input: &str) -> Result<(), EditorError> {
        let fragments = if input.trim_start().starts_with('{') {
            folio_codec::try_import(input)?
        } else {
            folio_codec::load(input)
        };
        info!(len = input.len(), "Loading document");
        self.replace_document(fragments);
        Ok(())
    }

    fn replace_document(&mut self, fragments: Vec<Fragment>) {
        self.update(|txn| {
            txn.skip_history();
            txn.replace_contents(fragments);
        });
        self.history.clear();
    }

    pub fn export(&self) -> String {
        export_string(&self.tree)
    }

    /// Restore the state before the last undo step
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.update(|txn| {
            txn.skip_history();
            txn.restore(snapshot);
        });
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.update(|txn| {
            txn.skip_history();
            txn.restore(snapshot);
        });
        true
    }

    pub fn register_update_listener(
        &mut self,
        listener: impl Fn(&DocumentTree, &Commit) + 'static,
    ) -> ListenerId {
        self.listeners.add_update(Box::new(listener))
    }

    pub fn register_selection_listener(
        &mut self,
        listener: impl Fn(Option<Selection>) + 'static,
    ) -> ListenerId {
        self.listeners.add_selection(Box::new(listener))
    }

    /// Install the change listener, replacing any previous one
    pub fn set_change_listener(&mut self, listener: impl Fn(&str) + 'static) -> ListenerId {
        self.listeners.set_change(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
