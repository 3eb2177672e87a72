//! # Folio Document
//!
//! Tree-structured rich-document model: node kinds, the document tree that
//! owns them, selections, and the transactions every mutation runs in.
//!
//! ## Usage
//!
//! ```rust
//! use folio_document::{DocumentTree, Fragment, MediaAttributes};
//!
//! let mut tree = DocumentTree::new();
//!
//! let mut txn = tree.begin();
//! txn.insert_at_selection(Fragment::image(MediaAttributes::new("/cat.png")))
//!     .unwrap();
//! let commit = txn.commit();
//!
//! assert!(commit.changed);
//! assert_eq!(tree.children(tree.root()).len(), 2);
//! ```

mod errors;
mod key;
pub mod node;
mod selection;
mod transaction;
mod tree;

pub use errors::{TreeError, TreeResult};
pub use key::{KeyGenerator, NodeKey};
pub use node::{
    Attribute, Dimension, FormatMask, Fragment, HeadingLevel, ListType, MediaAttributes,
    MediaKind, Node, NodeKind, OpaqueNode, TextFormat,
};
pub use selection::{Point, Selection};
pub use transaction::{Commit, Transaction};
pub use tree::{DocumentTree, TreeSnapshot};
