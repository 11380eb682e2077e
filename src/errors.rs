//! Error types for anchoring, vocabularies and model persistence.

use crate::span::Span;
use thiserror::Error;

/// Errors raised by the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The input source could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A segmented sentence does not occur in its line at or after the search origin.
    #[error("sentence {sentence:?} not found in line {line} at or after offset {from}")]
    SentenceNotFound {
        line: usize,
        sentence: String,
        from: usize,
    },

    /// A token does not occur in its sentence at or after the previous token's end.
    #[error("token {token_index} {token:?} not found in sentence {sentence} at or after offset {from}")]
    TokenNotFound {
        /// Span of the containing sentence
        sentence: Span,
        token_index: usize,
        token: String,
        from: usize,
    },

    /// Lookup of a string that a frozen vocabulary does not contain.
    #[error("unknown vocabulary entry {0:?}")]
    UnknownEntry(String),

    /// Lookup of an index past the end of a vocabulary.
    #[error("vocabulary index {index} out of range (size {size})")]
    UnknownIndex { index: usize, size: usize },

    #[error("failed to serialize feature model: {0}")]
    Serialization(#[from] ron::Error),

    /// A stored vocabulary breaks the one-index-per-entry invariant.
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("failed to deserialize feature model: {0}")]
    Deserialization(#[from] ron::error::SpannedError),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
