//! Composition of contexts and extractors into string features.

use super::context::ContextFactory;
use super::extractor::FeatureExtractor;
use crate::instance::FocusInstance;
use std::fmt;

/// Joins a context identifier and an extractor identifier.
pub const ID_DELIM: &str = "_";

/// Joins the per-token values of a multi-token context.
pub const CONTEXT_DELIM: &str = "|";

/// Separates a feature identifier from its value in vocabulary keys.
pub const VALUE_DELIM: &str = "=";

/// Identifier of the feature produced by `extractor` over `context`.
pub fn compute_id(context: &str, extractor: &str) -> String {
    format!("{}{}{}", context, ID_DELIM, extractor)
}

/// An identified string feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringFeature {
    pub id: String,
    pub value: String,
}

impl StringFeature {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Vocabulary key, `id=value`.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.id, VALUE_DELIM, self.value)
    }
}

impl fmt::Display for StringFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, VALUE_DELIM, self.value)
    }
}

/// Applies every extractor to every context of every builder.
///
/// Output order is builder order, then context order, then extractor order.
#[derive(Default)]
pub struct ContextFeatureExtractor {
    contexts: Vec<Box<dyn ContextFactory>>,
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl ContextFeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a context builder.
    pub fn context(mut self, factory: impl ContextFactory + 'static) -> Self {
        self.contexts.push(Box::new(factory));
        self
    }

    /// Add a per-token extractor.
    pub fn extractor(mut self, extractor: impl FeatureExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    pub fn apply(&self, instance: &FocusInstance) -> Vec<StringFeature> {
        let mut features = Vec::new();
        for factory in &self.contexts {
            for context in factory.contexts(instance) {
                for extractor in &self.extractors {
                    let values: Vec<String> = context
                        .tokens()
                        .iter()
                        .map(|token| extractor.extract(token))
                        .collect();
                    features.push(StringFeature::new(
                        compute_id(context.identifier(), extractor.id()),
                        values.join(CONTEXT_DELIM),
                    ));
                }
            }
        }
        features
    }
}

impl fmt::Debug for ContextFeatureExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextFeatureExtractor")
            .field("contexts", &self.contexts.len())
            .field(
                "extractors",
                &self.extractors.iter().map(|e| e.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
