//! # Ingestion Errors
//!
//! Raised before validation starts. Display strings are user-facing.

use thiserror::Error;

/// The input could not be turned into a document.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Body was empty or whitespace.
    #[error("no data")]
    NoData,

    /// Body is not a JSON object.
    #[error("is not valid json")]
    InvalidJson,

    /// A form field's rule declares a kind forms cannot carry.
    #[error("type is not support")]
    UnsupportedType {
        field: String,
        shape: &'static str,
    },

    /// Reading the body failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
