//! Token annotation from lookup resources.
//!
//! A [`MultimapResource`] maps keys to one or more values. A
//! [`ListAnnotator`] looks every token of a tree up in a resource and stores
//! the matching values under `FeatureKey::Custom(resource name)`, where any
//! extractor can read them back.

use super::extractor::FeatureExtractor;
use crate::errors::CoreResult;
use crate::tree::{FeatureKey, ParsedTree};
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

/// Separator between several values stored for one token.
pub const LIST_DELIM: &str = ",";

/// Named key → values table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultimapResource {
    name: String,
    entries: HashMap<String, Vec<String>>,
}

impl MultimapResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Load tab-separated `key<TAB>value[<TAB>value...]` lines.
    ///
    /// Repeated keys accumulate their values; lines without a value are ignored.
    pub fn from_reader<R: BufRead>(name: impl Into<String>, reader: R) -> CoreResult<Self> {
        let mut resource = Self::new(name);
        for line in reader.lines() {
            let line = line?;
            let mut fields = line.trim_end_matches('\r').split('\t');
            let Some(key) = fields.next().filter(|key| !key.is_empty()) else {
                continue;
            };
            for value in fields.filter(|value| !value.is_empty()) {
                resource.insert(key, value);
            }
        }
        tracing::debug!(resource = %resource.name, keys = resource.entries.len(), "loaded resource");
        Ok(resource)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.entries.entry(key.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values stored for `key`, in insertion order.
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Tags tokens with the resource values of an extracted key.
#[derive(Debug, Clone)]
pub struct ListAnnotator<E> {
    extractor: E,
    key: FeatureKey,
    resource: Arc<MultimapResource>,
}

impl<E: FeatureExtractor> ListAnnotator<E> {
    pub fn new(extractor: E, resource: Arc<MultimapResource>) -> Self {
        Self {
            extractor,
            key: FeatureKey::Custom(resource.name().to_string()),
            resource,
        }
    }

    /// Key the annotations are stored under.
    pub fn key(&self) -> &FeatureKey {
        &self.key
    }

    /// Annotate every token found in the resource; returns how many matched.
    ///
    /// Trees are annotated before they are shared between instances.
    pub fn annotate(&self, tree: &mut ParsedTree) -> usize {
        let mut matched = 0;
        for token in tree.tokens_mut() {
            let values = self.resource.get(&self.extractor.extract(token));
            if values.is_empty() {
                continue;
            }
            token.add_feature(self.key.clone(), values.join(LIST_DELIM));
            matched += 1;
        }
        matched
    }
}
