//! Anchored parsing and vocabulary-indexed features for word sense classifiers.
//!
//! ## Core Types
//!
//! - [`Span`] / [`Chunk`] - Character offsets into the original text
//! - [`ParsedTree`] / [`Token`] - Parsed sentences, optionally anchored
//! - [`SpanTracker`] - Recovers spans from a text-only [`NlpParser`]
//! - [`Vocabulary`] / [`FeatureModel`] - Stable string ↔ index mappings
//! - [`ContextFeatureExtractor`] - Context × extractor string features
//! - [`FeaturePipeline`] - Focus instances to sparse vectors
//!
//! ## Example
//!
//! ```
//! use clearsense::{Span, SpanTracker, UnicodeParser};
//!
//! let trees = SpanTracker::new(UnicodeParser).anchor("The fox jumps.\nIt ran.").unwrap();
//! assert_eq!(trees.len(), 2);
//! assert_eq!(trees[0].span, Some(Span::new(0, 14)));
//! assert_eq!(trees[0].tokens()[2].span, Some(Span::new(8, 13)));
//! ```

mod anchor;
mod errors;
pub mod features;
mod instance;
mod parser;
mod span;
mod tree;
mod vocabulary;

// Anchoring
pub use anchor::{AnchorFailure, AnchorReport, AnchoredTextReader, SpanTracker};
pub use parser::{NlpParser, UnicodeParser};
pub use span::{split_chunks, Chunk, Span};

// Structures
pub use instance::{FocusInstance, Labeled, SparseVector, StringInstance};
pub use tree::{FeatureKey, ParsedTree, Token};

// Indexing
pub use features::{ContextFeatureExtractor, FeaturePipeline, ListAnnotator, MultimapResource, StringFeature};
pub use vocabulary::{FeatureModel, Vocabulary};

pub use errors::{CoreError, CoreResult};

#[cfg(test)]
mod tests;
