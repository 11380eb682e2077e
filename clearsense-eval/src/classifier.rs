//! Classifier seams used by cross-validation.

use crate::errors::TrainError;
use clearsense::Labeled;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Something that can be trained on labeled instances.
///
/// A classifier is a candidate configuration: training never mutates it, so
/// the same value may be trained on many folds, from many threads.
pub trait Classifier<I>: Send + Sync {
    type Model: Predictor<I>;

    fn train(&self, instances: &[I]) -> Result<Self::Model, TrainError>;
}

/// A trained model.
pub trait Predictor<I> {
    fn predict(&self, instance: &I) -> Result<String, TrainError>;
}

type KeyFn<I> = Arc<dyn Fn(&I) -> Option<String> + Send + Sync>;

/// Predicts the most frequent training label.
///
/// With a key function the most frequent label is chosen per key (for
/// example per lemma); unseen keys fall back to the global choice. Ties go to
/// the lexicographically smallest label.
pub struct MostFrequentLabel<I> {
    key: Option<KeyFn<I>>,
}

impl<I> MostFrequentLabel<I> {
    pub fn new() -> Self {
        Self { key: None }
    }

    pub fn keyed<F>(key: F) -> Self
    where
        F: Fn(&I) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            key: Some(Arc::new(key)),
        }
    }
}

impl<I> Default for MostFrequentLabel<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Clone for MostFrequentLabel<I> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
        }
    }
}

impl<I> fmt::Debug for MostFrequentLabel<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MostFrequentLabel")
            .field("keyed", &self.key.is_some())
            .finish()
    }
}

/// Model trained by [`MostFrequentLabel`].
pub struct FrequencyModel<I> {
    fallback: String,
    by_key: HashMap<String, String>,
    key: Option<KeyFn<I>>,
}

impl<I> FrequencyModel<I> {
    /// The label predicted for unseen keys.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl<I> fmt::Debug for FrequencyModel<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyModel")
            .field("fallback", &self.fallback)
            .field("by_key", &self.by_key)
            .finish()
    }
}

impl<I: Labeled> Classifier<I> for MostFrequentLabel<I> {
    type Model = FrequencyModel<I>;

    fn train(&self, instances: &[I]) -> Result<Self::Model, TrainError> {
        let mut global: BTreeMap<&str, usize> = BTreeMap::new();
        let mut keyed: HashMap<String, BTreeMap<&str, usize>> = HashMap::new();
        for instance in instances {
            let Some(label) = instance.label() else {
                continue;
            };
            *global.entry(label).or_default() += 1;
            if let Some(key) = self.key.as_ref().and_then(|key| key(instance)) {
                *keyed.entry(key).or_default().entry(label).or_default() += 1;
            }
        }

        let fallback = most_frequent(&global).ok_or("no labeled training instances")?;
        let by_key = keyed
            .iter()
            .filter_map(|(key, counts)| Some((key.clone(), most_frequent(counts)?)))
            .collect();
        Ok(FrequencyModel {
            fallback,
            by_key,
            key: self.key.clone(),
        })
    }
}

impl<I> Predictor<I> for FrequencyModel<I> {
    fn predict(&self, instance: &I) -> Result<String, TrainError> {
        let label = self
            .key
            .as_ref()
            .and_then(|key| key(instance))
            .and_then(|key| self.by_key.get(&key))
            .unwrap_or(&self.fallback);
        Ok(label.clone())
    }
}

fn most_frequent(counts: &BTreeMap<&str, usize>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for (&label, &count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label.to_string())
}
