//! # Folio Codec
//!
//! Converts between the live [`DocumentTree`](folio_document::DocumentTree)
//! and its versioned JSON form.
//!
//! ```rust
//! use folio_codec::{export_string, import_tree, CANONICAL_EMPTY_DOCUMENT};
//!
//! let tree = import_tree("definitely not json");
//! assert_eq!(export_string(&tree), CANONICAL_EMPTY_DOCUMENT);
//! ```

mod errors;
mod export;
pub mod format;
mod import;

pub use errors::CodecError;
pub use export::{export, export_pretty, export_string};
pub use format::{
    SerializedDocument, SerializedNode, SerializedRoot, CANONICAL_EMPTY_DOCUMENT,
    CURRENT_VERSION,
};
pub use import::{import, import_document, import_tree, load, try_import};
