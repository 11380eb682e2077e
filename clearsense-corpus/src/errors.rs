//! Error types for corpus reading and writing.

use clearsense::CoreError;
use thiserror::Error;

/// Errors that can occur while reading or writing a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A header line does not have the expected field structure.
    #[error("malformed metadata at line {line}: {message}")]
    MalformedMetadata { line: usize, message: String },

    /// A token line does not have the expected columns.
    #[error("malformed tree at line {line}: {message}")]
    MalformedTree { line: usize, message: String },

    /// A header field holds text the header format cannot carry.
    #[error("cannot encode {field} {value:?} in a header line")]
    UnencodableField { field: &'static str, value: String },

    /// A header names a token the following tree does not have.
    #[error("focus token {token} out of range for tree at line {line} ({len} tokens)")]
    FocusOutOfRange { line: usize, token: usize, len: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CorpusError {
    /// Attach a 1-based source line number to a parse error.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            CorpusError::MalformedMetadata { message, .. } => {
                CorpusError::MalformedMetadata { line, message }
            }
            CorpusError::MalformedTree { message, .. } => CorpusError::MalformedTree { line, message },
            other => other,
        }
    }
}

/// Result type for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;
