//! Per-token feature extractors.

use crate::tree::{FeatureKey, Token};
use std::fmt;

/// Value used when a token lacks the requested feature.
pub const MISSING_VALUE: &str = "_";

/// Maps a token to a string value under a stable identifier.
pub trait FeatureExtractor: Send + Sync {
    fn id(&self) -> &str;

    fn extract(&self, token: &Token) -> String;
}

/// Reads a stored token feature.
#[derive(Debug, Clone)]
pub struct LookupExtractor {
    key: FeatureKey,
}

impl LookupExtractor {
    pub fn new(key: FeatureKey) -> Self {
        Self { key }
    }
}

impl FeatureExtractor for LookupExtractor {
    fn id(&self) -> &str {
        self.key.name()
    }

    fn extract(&self, token: &Token) -> String {
        token.feature(&self.key).unwrap_or(MISSING_VALUE).to_string()
    }
}

/// Lowercases the value of another extractor.
#[derive(Debug, Clone)]
pub struct LowercaseExtractor<E> {
    id: String,
    inner: E,
}

impl<E: FeatureExtractor> LowercaseExtractor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            id: format!("{}.lc", inner.id()),
            inner,
        }
    }
}

impl<E: FeatureExtractor> FeatureExtractor for LowercaseExtractor<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, token: &Token) -> String {
        self.inner.extract(token).to_lowercase()
    }
}

/// An extractor backed by a closure.
pub struct FnExtractor<F> {
    id: String,
    extract: F,
}

impl<F> FnExtractor<F>
where
    F: Fn(&Token) -> String + Send + Sync,
{
    pub fn new(id: impl Into<String>, extract: F) -> Self {
        Self {
            id: id.into(),
            extract,
        }
    }
}

impl<F> FeatureExtractor for FnExtractor<F>
where
    F: Fn(&Token) -> String + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, token: &Token) -> String {
        (self.extract)(token)
    }
}

impl<F> fmt::Debug for FnExtractor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExtractor").field("id", &self.id).finish()
    }
}
