//! Labeled instance corpora for clearsense.
//!
//! A corpus is a sequence of dependency-tree blocks, each preceded by one
//! `#` header line per labeled focus token. Headers may carry character
//! spans so instances keep their anchoring across a write/read cycle.
//!
//! ## Modules
//!
//! - [`metadata`] - One-line instance headers
//! - [`conll`] - Token-per-line tree blocks
//! - [`reader`] - Instance reading and writing
//! - [`errors`] - Error types for corpus handling
//!
//! ## Example
//!
//! ```
//! use clearsense::Labeled;
//! use clearsense_corpus::InstanceCorpusReader;
//!
//! let corpus = "# c.txt 0 1 run run.02\tThey run.\n\
//!               1\tThey\tthey\tPRP\t2\tnsubj\n\
//!               2\trun\trun\tVBP\t0\troot\n";
//! let instances = InstanceCorpusReader::default()
//!     .read_instances(corpus.as_bytes())
//!     .unwrap();
//! assert_eq!(instances[0].label(), Some("run.02"));
//! ```

pub mod conll;
pub mod errors;
pub mod metadata;
pub mod reader;

pub use conll::{read_blocks, tree_to_string, TreeBlock, EMPTY};
pub use errors::{CorpusError, CorpusResult};
pub use metadata::{strip_label_suffix, IndexRef, InstanceMetadata};
pub use reader::{metadata_for, InstanceCorpusReader, ReaderConfig, DEFAULT_SENSE};

#[cfg(test)]
mod tests;
