//! Error types for tree mutation

use crate::NodeKey;
use thiserror::Error;

/// Why a mutation primitive was rejected
///
/// A rejected primitive leaves the tree untouched; the surrounding
/// transaction still commits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("No selection target: node {0} does not exist")]
    NoSelectionTarget(NodeKey),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Node {key} ({kind}) has no attribute `{attribute}`")]
    AttributeMismatch {
        key: NodeKey,
        kind: String,
        attribute: &'static str,
    },

    #[error("Text offset {offset} is out of bounds for node {key}")]
    OffsetOutOfBounds { key: NodeKey, offset: usize },
}

pub type TreeResult<T> = Result<T, TreeError>;
