//! Error types for the codec

use thiserror::Error;

/// Why a serialized document could not be read
///
/// These never escape [`crate::import`]; they are only visible through
/// [`crate::try_import`] for callers that want diagnostics.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Document is empty")]
    Empty,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),
}
