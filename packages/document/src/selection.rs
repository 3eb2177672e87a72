use crate::NodeKey;
use serde::{Deserialize, Serialize};

/// A position inside the tree
///
/// For text nodes `offset` counts characters; for element nodes it is a
/// child index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub key: NodeKey,
    pub offset: usize,
}

impl Point {
    pub fn new(key: NodeKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// Current insertion / mutation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    /// A whole node (media nodes are selected this way)
    Node { key: NodeKey },
    /// A character range; `anchor == focus` is a caret
    Range { anchor: Point, focus: Point },
}

impl Selection {
    pub fn node(key: NodeKey) -> Self {
        Selection::Node { key }
    }

    pub fn caret(key: NodeKey, offset: usize) -> Self {
        let point = Point::new(key, offset);
        Selection::Range {
            anchor: point,
            focus: point,
        }
    }

    pub fn range(anchor: Point, focus: Point) -> Self {
        Selection::Range { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        match self {
            Selection::Node { .. } => false,
            Selection::Range { anchor, focus } => anchor == focus,
        }
    }

    /// Keys this selection points at
    pub fn keys(&self) -> Vec<NodeKey> {
        match self {
            Selection::Node { key } => vec![*key],
            Selection::Range { anchor, focus } => {
                if anchor.key == focus.key {
                    vec![anchor.key]
                } else {
                    vec![anchor.key, focus.key]
                }
            }
        }
    }

    /// Key the selection is "at" for insertion purposes
    pub fn focus_key(&self) -> NodeKey {
        match self {
            Selection::Node { key } => *key,
            Selection::Range { focus, .. } => focus.key,
        }
    }
}
