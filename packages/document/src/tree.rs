//! # Document Tree
//!
//! Owns the node graph of one document. Nodes live in a key-indexed arena;
//! structural ownership is expressed only through each node's ordered
//! `children` list. The key→parent index is a lookup aid and is never used to
//! re-parent anything outside the primitives below.
//!
//! ## Invariants
//!
//! - exactly one `Root`, never a child
//! - `Root` always has at least one child (`Root → [Paragraph]` minimum)
//! - leaves (`Text`, `Image`, `Video`, `LineBreak`) own no children
//! - keys are issued once and never reused
//!
//! The read API is public. Mutation primitives are crate-private and are
//! reachable only through an open [`crate::Transaction`].

use crate::node::{Attribute, Fragment, ListType, Node, NodeKind};
use crate::{KeyGenerator, NodeKey, Point, Selection, TreeError, TreeResult};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Editable document tree
#[derive(Debug, Clone)]
pub struct DocumentTree {
    /// Shared with snapshots until the next write (copy on write)
    nodes: Rc<HashMap<NodeKey, Node>>,
    parents: Rc<HashMap<NodeKey, NodeKey>>,
    root: NodeKey,
    selection: Option<Selection>,
    keys: KeyGenerator,
}

/// Frozen copy of the tree contents, used for history
///
/// Snapshots never include the key generator, so restoring one cannot
/// rewind key issuance.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    nodes: Rc<HashMap<NodeKey, Node>>,
    parents: Rc<HashMap<NodeKey, NodeKey>>,
    root: NodeKey,
    selection: Option<Selection>,
}

impl TreeSnapshot {
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl DocumentTree {
    /// Create the minimum valid document: `Root → [Paragraph]`
    pub fn new() -> Self {
        Self::from_fragments(Vec::new())
    }

    /// Build a tree from top-level fragments (the codec import path)
    ///
    /// Fragments that break structural rules are skipped. An empty result
    /// is repaired to the minimum document.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let mut keys = KeyGenerator::new();
        let root = keys.next_key();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(root, NodeKind::Root));

        let mut tree = Self {
            nodes: Rc::new(nodes),
            parents: Rc::new(HashMap::new()),
            root,
            selection: None,
            keys,
        };
        tree.append_fragments(fragments);
        tree.ensure_non_empty();
        tree
    }

    // ---------------------------------------------------------------------
    // Read API
    // ---------------------------------------------------------------------

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(&key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.parents.get(&key).copied()
    }

    /// Children of `key`; empty for leaves and unknown keys
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(&key)
            .map(|node| node.children())
            .unwrap_or(&[])
    }

    pub fn index_in_parent(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|child| *child == key)
    }

    /// All descendants of `key` in pre-order, `key` itself excluded
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(key).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every text node in document order
    pub fn text_nodes(&self) -> Vec<NodeKey> {
        self.descendants(self.root)
            .into_iter()
            .filter(|key| self.get(*key).map_or(false, |n| n.kind.is_text()))
            .collect()
    }

    /// Text nodes from `start` through `end` (inclusive) in document order
    ///
    /// Element endpoints include their whole subtree. Endpoint order does
    /// not matter.
    pub fn text_nodes_between(&self, start: NodeKey, end: NodeKey) -> Vec<NodeKey> {
        let order = self.descendants(self.root);
        let position = |key: NodeKey| order.iter().position(|k| *k == key);
        let (Some(a), Some(b)) = (position(start), position(end)) else {
            return Vec::new();
        };
        let (lo, last) = if a <= b { (a, end) } else { (b, start) };
        let last_descendant = self.descendants(last).last().copied().unwrap_or(last);
        let hi = position(last_descendant).unwrap_or(a.max(b));

        order[lo..=hi]
            .iter()
            .copied()
            .filter(|key| self.get(*key).map_or(false, |n| n.kind.is_text()))
            .collect()
    }

    /// The direct child of `Root` that contains `key`
    pub fn top_level_block(&self, key: NodeKey) -> Option<NodeKey> {
        if key == self.root || !self.contains(key) {
            return None;
        }
        let mut current = key;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn keys_issued(&self) -> u64 {
        self.keys.issued()
    }

    /// Plain text with top-level blocks separated by newlines
    pub fn text_content(&self) -> String {
        self.children(self.root)
            .iter()
            .map(|block| self.subtree_text(*block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn subtree_text(&self, key: NodeKey) -> String {
        let mut out = String::new();
        for node in std::iter::once(key)
            .chain(self.descendants(key))
            .filter_map(|k| self.get(k))
        {
            match &node.kind {
                NodeKind::Text { content, .. } => out.push_str(content),
                NodeKind::LineBreak => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Detached copy of the subtree rooted at `key`
    pub fn to_fragment(&self, key: NodeKey) -> Option<Fragment> {
        let node = self.get(key)?;
        let children = node
            .children()
            .iter()
            .filter_map(|child| self.to_fragment(*child))
            .collect();
        Some(Fragment::new(node.kind.clone(), children))
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            nodes: Rc::clone(&self.nodes),
            parents: Rc::clone(&self.parents),
            root: self.root,
            selection: self.selection,
        }
    }

    /// Whether the contents equal a snapshot (selection ignored)
    pub fn same_content(&self, snapshot: &TreeSnapshot) -> bool {
        self.root == snapshot.root
            && (Rc::ptr_eq(&self.nodes, &snapshot.nodes) || self.nodes == snapshot.nodes)
    }

    // ---------------------------------------------------------------------
    // Mutation primitives (crate-private; exposed through Transaction)
    // ---------------------------------------------------------------------

    pub(crate) fn restore(&mut self, snapshot: TreeSnapshot) {
        self.nodes = snapshot.nodes;
        self.parents = snapshot.parents;
        self.root = snapshot.root;
        self.selection = snapshot.selection;
    }

    /// Drop every top-level node and build new ones; keys keep counting up
    pub(crate) fn replace_contents(&mut self, fragments: Vec<Fragment>) {
        for child in self.children(self.root).to_vec() {
            self.drop_subtree(child);
        }
        if let Some(root) = Rc::make_mut(&mut self.nodes).get_mut(&self.root) {
            root.children.clear();
        }
        self.selection = None;
        self.append_fragments(fragments);
        self.ensure_non_empty();
    }

    fn append_fragments(&mut self, fragments: Vec<Fragment>) {
        for fragment in fragments {
            if let Err(err) = self.append_child(self.root, fragment) {
                debug!(error = %err, "Skipping fragment that cannot live under root");
            }
        }
    }

    pub(crate) fn insert_at(
        &mut self,
        parent: NodeKey,
        index: usize,
        fragment: Fragment,
    ) -> TreeResult<NodeKey> {
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(TreeError::NoSelectionTarget(parent))?;

        if parent_node.kind.is_leaf() {
            return Err(TreeError::InvalidStructure(format!(
                "{} node {} cannot have children",
                parent_node.kind.type_name(),
                parent
            )));
        }
        check_fragment(&fragment)?;

        let key = self.build(fragment, parent);
        if let Some(node) = Rc::make_mut(&mut self.nodes).get_mut(&parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, key);
        }
        Ok(key)
    }

    pub(crate) fn append_child(&mut self, parent: NodeKey, fragment: Fragment) -> TreeResult<NodeKey> {
        let index = self.children(parent).len();
        self.insert_at(parent, index, fragment)
    }

    pub(crate) fn append_to_root(&mut self, fragment: Fragment) -> TreeResult<NodeKey> {
        self.append_child(self.root, fragment)
    }

    pub(crate) fn insert_after(&mut self, anchor: NodeKey, fragment: Fragment) -> TreeResult<NodeKey> {
        let (parent, index) = self.sibling_slot(anchor)?;
        self.insert_at(parent, index + 1, fragment)
    }

    pub(crate) fn insert_before(&mut self, anchor: NodeKey, fragment: Fragment) -> TreeResult<NodeKey> {
        let (parent, index) = self.sibling_slot(anchor)?;
        self.insert_at(parent, index, fragment)
    }

    fn sibling_slot(&self, anchor: NodeKey) -> TreeResult<(NodeKey, usize)> {
        if !self.contains(anchor) {
            return Err(TreeError::NoSelectionTarget(anchor));
        }
        if anchor == self.root {
            return Err(TreeError::InvalidStructure(
                "root cannot have siblings".to_string(),
            ));
        }
        let parent = self
            .parent(anchor)
            .ok_or(TreeError::NoSelectionTarget(anchor))?;
        let index = self
            .index_in_parent(anchor)
            .ok_or(TreeError::NoSelectionTarget(anchor))?;
        Ok((parent, index))
    }

    /// Insert at the current selection, falling back to the end of the document
    ///
    /// The selection moves to the inserted node.
    pub(crate) fn insert_at_selection(&mut self, fragment: Fragment) -> TreeResult<NodeKey> {
        check_fragment(&fragment)?;
        self.validate_selection();

        let key = match self.selection {
            Some(Selection::Node { key }) if key == self.root => self.append_to_root(fragment)?,
            Some(Selection::Node { key }) => self.insert_after(key, fragment)?,
            Some(Selection::Range { focus, .. }) => self.insert_at_point(focus, fragment)?,
            None => {
                if self.children(self.root).is_empty() {
                    self.append_to_root(Fragment::empty_paragraph())?;
                }
                self.append_to_root(fragment)?
            }
        };

        self.selection = Some(Selection::node(key));
        Ok(key)
    }

    fn insert_at_point(&mut self, point: Point, fragment: Fragment) -> TreeResult<NodeKey> {
        let node = self
            .get(point.key)
            .ok_or(TreeError::NoSelectionTarget(point.key))?;

        match &node.kind {
            NodeKind::Text { content, .. } => {
                let len = content.chars().count();
                if point.offset == 0 {
                    self.insert_before(point.key, fragment)
                } else if point.offset >= len {
                    self.insert_after(point.key, fragment)
                } else {
                    self.split_text(point.key, point.offset)?;
                    self.insert_after(point.key, fragment)
                }
            }
            kind if kind.is_leaf() => self.insert_after(point.key, fragment),
            _ => self.insert_at(point.key, point.offset, fragment),
        }
    }

    /// Detach and drop the subtree at `key`, returning a detached copy
    pub(crate) fn remove(&mut self, key: NodeKey) -> TreeResult<Fragment> {
        if key == self.root {
            return Err(TreeError::InvalidStructure(
                "root cannot be removed".to_string(),
            ));
        }
        let fragment = self
            .to_fragment(key)
            .ok_or(TreeError::NoSelectionTarget(key))?;

        self.detach(key);
        self.drop_subtree(key);
        debug!(key = %key, nodes = fragment.size(), "Removed subtree");

        self.ensure_non_empty();
        self.validate_selection();
        Ok(fragment)
    }

    pub(crate) fn set_attribute(&mut self, key: NodeKey, attribute: Attribute) -> TreeResult<()> {
        if !self.contains(key) {
            return Err(TreeError::NoSelectionTarget(key));
        }
        if let Attribute::Src(src) = &attribute {
            if src.trim().is_empty() {
                return Err(TreeError::InvalidStructure(format!(
                    "media node {} requires a src",
                    key
                )));
            }
        }

        let node = Rc::make_mut(&mut self.nodes)
            .get_mut(&key)
            .ok_or(TreeError::NoSelectionTarget(key))?;

        let name = attribute.name();
        if attribute.apply_to(&mut node.kind) {
            Ok(())
        } else {
            Err(TreeError::AttributeMismatch {
                key,
                kind: node.kind.type_name().to_string(),
                attribute: name,
            })
        }
    }

    /// Split a text node at a character offset strictly inside it
    ///
    /// The left part keeps `key`; the right part becomes a new sibling with
    /// the same format. Selection points past the split follow the right part.
    pub(crate) fn split_text(&mut self, key: NodeKey, offset: usize) -> TreeResult<NodeKey> {
        let node = self.get(key).ok_or(TreeError::NoSelectionTarget(key))?;
        let (content, format) = match &node.kind {
            NodeKind::Text { content, format } => (content.clone(), *format),
            other => {
                return Err(TreeError::InvalidStructure(format!(
                    "cannot split {} node {}",
                    other.type_name(),
                    key
                )))
            }
        };

        let len = content.chars().count();
        if offset == 0 || offset >= len {
            return Err(TreeError::OffsetOutOfBounds { key, offset });
        }

        let byte = content
            .char_indices()
            .nth(offset)
            .map(|(index, _)| index)
            .unwrap_or(content.len());
        let (left, right) = content.split_at(byte);

        let right_key = self.insert_after(key, Fragment::formatted_text(right, format))?;
        self.set_attribute(key, Attribute::Text(left.to_string()))?;

        self.selection = self.selection.map(|selection| {
            let shift = |point: Point| {
                if point.key == key && point.offset > offset {
                    Point::new(right_key, point.offset - offset)
                } else {
                    point
                }
            };
            match selection {
                Selection::Range { anchor, focus } => Selection::range(shift(anchor), shift(focus)),
                other => other,
            }
        });

        Ok(right_key)
    }

    /// Swap the wrapper of an element node, keeping its children
    ///
    /// A new key is issued for the new wrapper; selections on the old
    /// wrapper follow it.
    pub(crate) fn replace_block(&mut self, key: NodeKey, kind: NodeKind) -> TreeResult<NodeKey> {
        if kind.is_leaf() || matches!(kind, NodeKind::Root) {
            return Err(TreeError::InvalidStructure(format!(
                "{} cannot wrap children",
                kind.type_name()
            )));
        }
        let (parent, index) = self.sibling_slot(key)?;
        if self.get(key).map_or(false, |node| node.kind.is_leaf()) {
            return Err(TreeError::InvalidStructure(format!(
                "leaf node {} has no wrapper to replace",
                key
            )));
        }

        let new_key = self.keys.next_key();
        Rc::make_mut(&mut self.nodes).insert(new_key, Node::new(new_key, kind));
        Rc::make_mut(&mut self.parents).insert(new_key, parent);
        if let Some(slot) = Rc::make_mut(&mut self.nodes)
            .get_mut(&parent)
            .and_then(|parent_node| parent_node.children.get_mut(index))
        {
            *slot = new_key;
        }
        self.move_children(key, new_key);
        Rc::make_mut(&mut self.nodes).remove(&key);
        Rc::make_mut(&mut self.parents).remove(&key);
        self.remap_selection(key, new_key);

        Ok(new_key)
    }

    /// Turn a block into `List → [ListItem → block children]`
    pub(crate) fn wrap_in_list(&mut self, key: NodeKey, list_type: ListType) -> TreeResult<NodeKey> {
        let (parent, index) = self.sibling_slot(key)?;
        if self.get(key).map_or(false, |node| node.kind.is_leaf()) {
            return Err(TreeError::InvalidStructure(format!(
                "leaf node {} cannot become a list item",
                key
            )));
        }

        let list = self.insert_at(
            parent,
            index,
            Fragment::list(list_type, vec![Fragment::list_item(Vec::new())]),
        )?;
        let item = self
            .children(list)
            .first()
            .copied()
            .ok_or(TreeError::NoSelectionTarget(list))?;

        self.move_children(key, item);
        self.detach(key);
        Rc::make_mut(&mut self.nodes).remove(&key);
        Rc::make_mut(&mut self.parents).remove(&key);
        self.remap_selection(key, item);

        Ok(list)
    }

    /// Replace a list with one paragraph per item
    pub(crate) fn unwrap_list(&mut self, list: NodeKey) -> TreeResult<Vec<NodeKey>> {
        let node = self.get(list).ok_or(TreeError::NoSelectionTarget(list))?;
        if !matches!(node.kind, NodeKind::List { .. }) {
            return Err(TreeError::InvalidStructure(format!(
                "{} node {} is not a list",
                node.kind.type_name(),
                list
            )));
        }
        let items = node.children().to_vec();
        let (parent, index) = self.sibling_slot(list)?;

        let mut paragraphs = Vec::with_capacity(items.len());
        for (offset, item) in items.into_iter().enumerate() {
            let paragraph = self.insert_at(parent, index + offset, Fragment::empty_paragraph())?;
            let is_item = matches!(
                self.get(item).map(|n| &n.kind),
                Some(NodeKind::ListItem)
            );
            if is_item {
                self.move_children(item, paragraph);
                self.remap_selection(item, paragraph);
            } else {
                self.detach(item);
                Rc::make_mut(&mut self.parents).insert(item, paragraph);
                if let Some(p) = Rc::make_mut(&mut self.nodes).get_mut(&paragraph) {
                    p.children.push(item);
                }
            }
            paragraphs.push(paragraph);
        }

        self.remove(list)?;
        Ok(paragraphs)
    }

    pub(crate) fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.validate_selection();
    }

    /// Restore `Root → [Paragraph]` if the root lost all its children
    pub(crate) fn ensure_non_empty(&mut self) -> bool {
        if !self.children(self.root).is_empty() {
            return false;
        }
        let paragraph = self.build(Fragment::empty_paragraph(), self.root);
        if let Some(root) = Rc::make_mut(&mut self.nodes).get_mut(&self.root) {
            root.children.push(paragraph);
        }
        debug!(key = %paragraph, "Root was empty, inserted paragraph");
        true
    }

    /// Drop selections that point at missing nodes and clamp offsets
    ///
    /// Returns whether the selection changed.
    pub(crate) fn validate_selection(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let normalized = match selection {
            Selection::Node { key } => self.contains(key).then_some(selection),
            Selection::Range { anchor, focus } => {
                match (self.clamp_point(anchor), self.clamp_point(focus)) {
                    (Some(anchor), Some(focus)) => Some(Selection::range(anchor, focus)),
                    _ => None,
                }
            }
        };
        let changed = normalized != self.selection;
        self.selection = normalized;
        changed
    }

    fn clamp_point(&self, point: Point) -> Option<Point> {
        let node = self.get(point.key)?;
        let max = match &node.kind {
            NodeKind::Text { content, .. } => content.chars().count(),
            _ => node.children().len(),
        };
        Some(Point::new(point.key, point.offset.min(max)))
    }

    // ---------------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------------

    fn build(&mut self, fragment: Fragment, parent: NodeKey) -> NodeKey {
        let key = self.keys.next_key();
        let Fragment { kind, children } = fragment;
        Rc::make_mut(&mut self.nodes).insert(key, Node::new(key, kind));
        Rc::make_mut(&mut self.parents).insert(key, parent);

        let child_keys: Vec<NodeKey> = children
            .into_iter()
            .map(|child| self.build(child, key))
            .collect();
        if let Some(node) = Rc::make_mut(&mut self.nodes).get_mut(&key) {
            node.children = child_keys;
        }
        key
    }

    /// Unlink `key` from its parent's child list
    fn detach(&mut self, key: NodeKey) {
        if let Some(parent) = self.parent(key) {
            if let Some(parent_node) = Rc::make_mut(&mut self.nodes).get_mut(&parent) {
                parent_node.children.retain(|child| *child != key);
            }
        }
        Rc::make_mut(&mut self.parents).remove(&key);
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(node) = Rc::make_mut(&mut self.nodes).remove(&next) {
                stack.extend(node.children);
            }
            Rc::make_mut(&mut self.parents).remove(&next);
        }
    }

    /// Append all children of `from` to `to`
    fn move_children(&mut self, from: NodeKey, to: NodeKey) {
        let moved = match Rc::make_mut(&mut self.nodes).get_mut(&from) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in &moved {
            Rc::make_mut(&mut self.parents).insert(*child, to);
        }
        if let Some(target) = Rc::make_mut(&mut self.nodes).get_mut(&to) {
            target.children.extend(moved);
        }
    }

    fn remap_selection(&mut self, from: NodeKey, to: NodeKey) {
        let remap = |point: Point| {
            if point.key == from {
                Point::new(to, point.offset)
            } else {
                point
            }
        };
        self.selection = self.selection.map(|selection| match selection {
            Selection::Node { key } if key == from => Selection::node(to),
            Selection::Range { anchor, focus } => Selection::range(remap(anchor), remap(focus)),
            other => other,
        });
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

fn check_fragment(fragment: &Fragment) -> TreeResult<()> {
    if matches!(fragment.kind, NodeKind::Root) {
        return Err(TreeError::InvalidStructure(
            "root cannot be inserted".to_string(),
        ));
    }
    if fragment
        .kind
        .media()
        .map_or(false, |media| media.src.trim().is_empty())
    {
        return Err(TreeError::InvalidStructure(format!(
            "{} requires a src",
            fragment.kind.type_name()
        )));
    }
    if fragment.kind.is_leaf() && !fragment.children.is_empty() {
        return Err(TreeError::InvalidStructure(format!(
            "{} cannot have children",
            fragment.kind.type_name()
        )));
    }
    fragment.children.iter().try_for_each(check_fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MediaAttributes, TextFormat};

    fn sample() -> DocumentTree {
        DocumentTree::from_fragments(vec![
            Fragment::paragraph(vec![Fragment::text("Hello "), Fragment::text("world")]),
            Fragment::heading(crate::HeadingLevel::H2, vec![Fragment::text("Title")]),
        ])
    }

    #[test]
    fn test_new_tree_is_minimum_document() {
        let tree = DocumentTree::new();
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 1);
        assert_eq!(tree.get(children[0]).unwrap().kind, NodeKind::Paragraph);
        assert!(tree.children(children[0]).is_empty());
    }

    #[test]
    fn test_descendants_are_preorder() {
        let tree = sample();
        let kinds: Vec<&str> = tree
            .descendants(tree.root())
            .into_iter()
            .map(|k| tree.get(k).unwrap().kind.type_name())
            .collect();
        assert_eq!(kinds, vec!["paragraph", "text", "text", "heading", "text"]);
        assert_eq!(tree.text_content(), "Hello world\nTitle");
    }

    #[test]
    fn test_remove_last_block_restores_paragraph() {
        let mut tree = DocumentTree::new();
        let paragraph = tree.children(tree.root())[0];
        tree.remove(paragraph).unwrap();

        let children = tree.children(tree.root());
        assert_eq!(children.len(), 1);
        assert_ne!(children[0], paragraph);
        assert!(!tree.contains(paragraph));
    }

    #[test]
    fn test_keys_are_never_reused() {
        let mut tree = DocumentTree::new();
        let paragraph = tree.children(tree.root())[0];
        tree.remove(paragraph).unwrap();
        let key = tree.append_to_root(Fragment::empty_paragraph()).unwrap();
        assert!(key > paragraph);
    }

    #[test]
    fn test_stale_key_is_rejected() {
        let mut tree = sample();
        let paragraph = tree.children(tree.root())[0];
        tree.remove(paragraph).unwrap();

        assert_eq!(
            tree.insert_after(paragraph, Fragment::empty_paragraph()),
            Err(TreeError::NoSelectionTarget(paragraph))
        );
        assert_eq!(
            tree.set_attribute(paragraph, Attribute::Caption("x".into())),
            Err(TreeError::NoSelectionTarget(paragraph))
        );
    }

    #[test]
    fn test_leaf_cannot_receive_children() {
        let mut tree = sample();
        let text = tree.text_nodes()[0];
        let result = tree.append_child(text, Fragment::text("nope"));
        assert!(matches!(result, Err(TreeError::InvalidStructure(_))));
    }

    #[test]
    fn test_root_has_no_siblings() {
        let mut tree = sample();
        let root = tree.root();
        assert!(matches!(
            tree.insert_after(root, Fragment::empty_paragraph()),
            Err(TreeError::InvalidStructure(_))
        ));
        assert!(matches!(tree.remove(root), Err(TreeError::InvalidStructure(_))));
    }

    #[test]
    fn test_split_text_keeps_format_and_moves_caret() {
        let mut tree = DocumentTree::from_fragments(vec![Fragment::paragraph(vec![
            Fragment::formatted_text("héllo", TextFormat::Bold.into()),
        ])]);
        let text = tree.text_nodes()[0];
        tree.set_selection(Some(Selection::caret(text, 4)));

        let right = tree.split_text(text, 2).unwrap();
        assert_eq!(tree.get(text).unwrap().text(), Some("hé"));
        assert_eq!(tree.get(right).unwrap().text(), Some("llo"));
        assert_eq!(tree.get(right).unwrap().format(), Some(TextFormat::Bold.into()));
        assert_eq!(tree.selection(), Some(Selection::caret(right, 2)));

        assert_eq!(
            tree.split_text(text, 2),
            Err(TreeError::OffsetOutOfBounds { key: text, offset: 2 })
        );
    }

    #[test]
    fn test_insert_at_selection_without_selection_appends() {
        let mut tree = sample();
        let key = tree
            .insert_at_selection(Fragment::image(MediaAttributes::new("a.png")))
            .unwrap();
        let children = tree.children(tree.root());
        assert_eq!(*children.last().unwrap(), key);
        assert_eq!(tree.selection(), Some(Selection::node(key)));
    }

    #[test]
    fn test_insert_at_caret_splits_text() {
        let mut tree = sample();
        let hello = tree.text_nodes()[0];
        tree.set_selection(Some(Selection::caret(hello, 3)));

        let image = tree
            .insert_at_selection(Fragment::image(MediaAttributes::new("a.png")))
            .unwrap();

        let paragraph = tree.children(tree.root())[0];
        let kinds: Vec<&str> = tree
            .children(paragraph)
            .iter()
            .map(|k| tree.get(*k).unwrap().kind.type_name())
            .collect();
        assert_eq!(kinds, vec!["text", "image", "text", "text"]);
        assert_eq!(tree.children(paragraph)[1], image);
        assert_eq!(tree.get(hello).unwrap().text(), Some("Hel"));
    }

    #[test]
    fn test_replace_block_preserves_children() {
        let mut tree = sample();
        let paragraph = tree.children(tree.root())[0];
        let children = tree.children(paragraph).to_vec();
        tree.set_selection(Some(Selection::node(paragraph)));

        let heading = tree
            .replace_block(paragraph, NodeKind::Heading(crate::HeadingLevel::H1))
            .unwrap();

        assert_eq!(tree.children(tree.root())[0], heading);
        assert_eq!(tree.children(heading), children.as_slice());
        assert_eq!(tree.parent(children[0]), Some(heading));
        assert!(!tree.contains(paragraph));
        assert_eq!(tree.selection(), Some(Selection::node(heading)));
    }

    #[test]
    fn test_wrap_and_unwrap_list() {
        let mut tree = sample();
        let paragraph = tree.children(tree.root())[0];
        let texts = tree.children(paragraph).to_vec();

        let list = tree.wrap_in_list(paragraph, ListType::Unordered).unwrap();
        assert_eq!(tree.children(tree.root())[0], list);
        let item = tree.children(list)[0];
        assert_eq!(tree.children(item), texts.as_slice());

        let paragraphs = tree.unwrap_list(list).unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(tree.children(paragraphs[0]), texts.as_slice());
        assert!(!tree.contains(list));
        assert_eq!(tree.children(tree.root()).len(), 2);
    }

    #[test]
    fn test_text_nodes_between_spans_blocks() {
        let tree = sample();
        let texts = tree.text_nodes();
        assert_eq!(tree.text_nodes_between(texts[1], texts[2]), vec![texts[1], texts[2]]);
        assert_eq!(tree.text_nodes_between(texts[2], texts[0]), texts);

        let heading = tree.children(tree.root())[1];
        assert_eq!(tree.text_nodes_between(texts[0], heading), texts);
    }

    #[test]
    fn test_restore_does_not_rewind_keys() {
        let mut tree = sample();
        let snapshot = tree.snapshot();
        let added = tree.append_to_root(Fragment::empty_paragraph()).unwrap();
        tree.restore(snapshot);
        assert!(!tree.contains(added));
        let next = tree.append_to_root(Fragment::empty_paragraph()).unwrap();
        assert!(next > added);
    }

    #[test]
    fn test_media_src_cannot_be_blank() {
        let mut tree = sample();
        let image = tree
            .append_to_root(Fragment::image(MediaAttributes::new("/a.png")))
            .unwrap();

        let result = tree.set_attribute(image, Attribute::Src("  ".to_string()));
        assert!(matches!(result, Err(TreeError::InvalidStructure(_))));
        assert_eq!(tree.get(image).unwrap().kind.media().unwrap().src, "/a.png");

        let result = tree.append_to_root(Fragment::video(MediaAttributes::new("")));
        assert!(matches!(result, Err(TreeError::InvalidStructure(_))));
    }

    #[test]
    fn test_snapshot_shares_nodes_until_written() {
        let mut tree = sample();
        let snapshot = tree.snapshot();
        assert!(Rc::ptr_eq(&tree.nodes, &snapshot.nodes));

        let added = tree.append_to_root(Fragment::empty_paragraph()).unwrap();
        assert!(!Rc::ptr_eq(&tree.nodes, &snapshot.nodes));
        assert!(!snapshot.nodes.contains_key(&added));
        assert!(!tree.same_content(&snapshot));
    }
}
