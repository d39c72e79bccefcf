//! Error types shared by the conversion pipeline and the validator.

use thiserror::Error;

/// Errors produced by the library.
///
/// `MalformedRecord` is recoverable inside the pipeline (the line is skipped
/// and counted); the other variants are surfaced to the caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed record on line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("dataset sizes don't match: original has {original} entries, converted has {converted}")]
    DatasetSizeMismatch { original: usize, converted: usize },

    #[error("invalid rule pattern {pattern:?}: {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
