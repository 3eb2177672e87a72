//! # Transactions
//!
//! Every tree mutation happens through a [`Transaction`]. A transaction
//! borrows the tree mutably for its whole lifetime, so mutations cannot
//! happen outside one and transactions cannot nest: code running inside a
//! transaction keeps mutating through the same handle.
//!
//! ```text
//! Idle ──begin()──▶ InTransaction ──commit()──▶ Idle
//!                     │  primitives          │
//!                     │  (rejections logged) ▼
//!                     │              ensure_non_empty
//!                     │              validate selection
//!                     └────────────▶ Commit summary
//! ```
//!
//! Committing does not notify anyone; the editor turns the returned
//! [`Commit`] into history entries and listener calls.

use crate::node::{Attribute, Fragment, ListType, NodeKind};
use crate::{DocumentTree, NodeKey, Selection, TreeError, TreeResult, TreeSnapshot};
use tracing::warn;

/// Open mutation scope over a [`DocumentTree`]
#[derive(Debug)]
pub struct Transaction<'t> {
    tree: &'t mut DocumentTree,
    before: TreeSnapshot,
    history_tag: Option<String>,
    skip_history: bool,
    rejected: Vec<TreeError>,
}

/// What a committed transaction did
#[derive(Debug, Clone)]
pub struct Commit {
    /// Tree contents when the transaction opened
    pub before: TreeSnapshot,
    /// Whether the node contents differ from `before`
    pub changed: bool,
    pub selection_changed: bool,
    /// Whether the empty-root repair ran at commit time
    pub repaired: bool,
    pub history_tag: Option<String>,
    pub skip_history: bool,
    /// Primitives that were rejected as no-ops
    pub rejected: Vec<TreeError>,
}

impl DocumentTree {
    /// Open a transaction over this tree
    pub fn begin(&mut self) -> Transaction<'_> {
        let before = self.snapshot();
        Transaction {
            tree: self,
            before,
            history_tag: None,
            skip_history: false,
            rejected: Vec::new(),
        }
    }
}

impl<'t> Transaction<'t> {
    /// Read access to the tree as mutated so far
    pub fn tree(&self) -> &DocumentTree {
        self.tree
    }

    pub fn selection(&self) -> Option<Selection> {
        self.tree.selection()
    }

    pub fn insert_after(&mut self, anchor: NodeKey, fragment: Fragment) -> TreeResult<NodeKey> {
        let result = self.tree.insert_after(anchor, fragment);
        self.track(result)
    }

    pub fn insert_before(&mut self, anchor: NodeKey, fragment: Fragment) -> TreeResult<NodeKey> {
        let result = self.tree.insert_before(anchor, fragment);
        self.track(result)
    }

    pub fn insert_at_selection(&mut self, fragment: Fragment) -> TreeResult<NodeKey> {
        let result = self.tree.insert_at_selection(fragment);
        self.track(result)
    }

    pub fn append_child(&mut self, parent: NodeKey, fragment: Fragment) -> TreeResult<NodeKey> {
        let result = self.tree.append_child(parent, fragment);
        self.track(result)
    }

    pub fn append_to_root(&mut self, fragment: Fragment) -> TreeResult<NodeKey> {
        let result = self.tree.append_to_root(fragment);
        self.track(result)
    }

    pub fn remove(&mut self, key: NodeKey) -> TreeResult<Fragment> {
        let result = self.tree.remove(key);
        self.track(result)
    }

    pub fn set_attribute(&mut self, key: NodeKey, attribute: Attribute) -> TreeResult<()> {
        let result = self.tree.set_attribute(key, attribute);
        self.track(result)
    }

    pub fn split_text(&mut self, key: NodeKey, offset: usize) -> TreeResult<NodeKey> {
        let result = self.tree.split_text(key, offset);
        self.track(result)
    }

    pub fn replace_block(&mut self, key: NodeKey, kind: NodeKind) -> TreeResult<NodeKey> {
        let result = self.tree.replace_block(key, kind);
        self.track(result)
    }

    pub fn wrap_in_list(&mut self, key: NodeKey, list_type: ListType) -> TreeResult<NodeKey> {
        let result = self.tree.wrap_in_list(key, list_type);
        self.track(result)
    }

    pub fn unwrap_list(&mut self, list: NodeKey) -> TreeResult<Vec<NodeKey>> {
        let result = self.tree.unwrap_list(list);
        self.track(result)
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.tree.set_selection(selection);
    }

    pub fn ensure_non_empty(&mut self) -> bool {
        self.tree.ensure_non_empty()
    }

    /// Replace the whole document body (load path)
    pub fn replace_contents(&mut self, fragments: Vec<Fragment>) {
        self.tree.replace_contents(fragments);
    }

    /// Put back a snapshot taken earlier from this tree (undo/redo path)
    pub fn restore(&mut self, snapshot: TreeSnapshot) {
        self.tree.restore(snapshot);
    }

    /// Commits sharing a tag merge into one history entry
    pub fn set_history_tag(&mut self, tag: impl Into<String>) {
        self.history_tag = Some(tag.into());
    }

    pub fn skip_history(&mut self) {
        self.skip_history = true;
    }

    pub fn rejected(&self) -> &[TreeError] {
        &self.rejected
    }

    /// Close the transaction: repair invariants and summarize
    pub fn commit(self) -> Commit {
        let repaired = self.tree.ensure_non_empty();
        self.tree.validate_selection();

        let changed = !self.tree.same_content(&self.before);
        let selection_changed = self.tree.selection() != self.before.selection();

        Commit {
            before: self.before,
            changed,
            selection_changed,
            repaired,
            history_tag: self.history_tag,
            skip_history: self.skip_history,
            rejected: self.rejected,
        }
    }

    fn track<T>(&mut self, result: TreeResult<T>) -> TreeResult<T> {
        if let Err(err) = &result {
            warn!(error = %err, "Mutation rejected");
            self.rejected.push(err.clone());
        }
        result
    }
}
