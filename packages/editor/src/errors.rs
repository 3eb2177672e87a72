//! Error types for the editor

use crate::config::ConfigError;
use folio_codec::CodecError;
use folio_document::{NodeKey, TreeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Node {0} is not a media node")]
    NotMedia(NodeKey),
}
