//! String ↔ index vocabularies and the feature model built from them.
//!
//! A [`Vocabulary`] assigns dense indices starting at 0 in order of first
//! encounter. It is growable while a model is trained and frozen once the
//! model is used for inference; a frozen vocabulary never changes, and
//! unseen strings resolve to a reserved unknown entry if one was declared.

use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Persisted form of a vocabulary; the reverse index is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVocabulary {
    entries: Vec<String>,
    #[serde(default)]
    frozen: bool,
    #[serde(default)]
    unknown: Option<String>,
}

/// Bidirectional, append-only mapping between strings and dense indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredVocabulary", into = "StoredVocabulary")]
pub struct Vocabulary {
    entries: Vec<String>,
    indices: HashMap<String, usize>,
    frozen: bool,
    unknown: Option<usize>,
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.frozen == other.frozen && self.unknown == other.unknown
    }
}

impl Eq for Vocabulary {}

impl Vocabulary {
    /// Create an empty growable vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a growable vocabulary whose index 0 is reserved for unseen strings.
    pub fn with_unknown(unknown: impl Into<String>) -> Self {
        let mut vocabulary = Self::new();
        let index = vocabulary.insert(unknown.into());
        vocabulary.unknown = Some(index);
        vocabulary
    }

    fn insert(&mut self, entry: String) -> usize {
        let index = self.entries.len();
        self.indices.insert(entry.clone(), index);
        self.entries.push(entry);
        index
    }

    /// Index of `entry`, inserting it when growable.
    ///
    /// A frozen vocabulary returns the unknown index for unseen strings, or
    /// [`CoreError::UnknownEntry`] if it has none.
    pub fn index_or_insert(&mut self, entry: &str) -> CoreResult<usize> {
        if let Some(&index) = self.indices.get(entry) {
            return Ok(index);
        }
        if self.frozen {
            return self.unknown_for(entry);
        }
        Ok(self.insert(entry.to_string()))
    }

    /// Read-only lookup that applies the unknown-entry rule.
    ///
    /// Unseen strings resolve to the unknown index when one is reserved and
    /// fail otherwise, in either mode.
    pub fn resolve(&self, entry: &str) -> CoreResult<usize> {
        match self.indices.get(entry) {
            Some(&index) => Ok(index),
            None => self.unknown_for(entry),
        }
    }

    fn unknown_for(&self, entry: &str) -> CoreResult<usize> {
        self.unknown
            .ok_or_else(|| CoreError::UnknownEntry(entry.to_string()))
    }

    /// Index of `entry` if present.
    pub fn index_of(&self, entry: &str) -> Option<usize> {
        self.indices.get(entry).copied()
    }

    /// Entry stored at `index`.
    pub fn string_of(&self, index: usize) -> CoreResult<&str> {
        self.entries
            .get(index)
            .map(String::as_str)
            .ok_or(CoreError::UnknownIndex {
                index,
                size: self.entries.len(),
            })
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.indices.contains_key(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index reserved for unseen strings, if any.
    pub fn unknown_index(&self) -> Option<usize> {
        self.unknown
    }

    /// Stop accepting new entries.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }
}

impl TryFrom<StoredVocabulary> for Vocabulary {
    type Error = CoreError;

    /// Rebuild the reverse index, rejecting blobs that could not have been
    /// written by a vocabulary.
    fn try_from(stored: StoredVocabulary) -> CoreResult<Self> {
        let mut indices = HashMap::with_capacity(stored.entries.len());
        for (index, entry) in stored.entries.iter().enumerate() {
            if indices.insert(entry.clone(), index).is_some() {
                return Err(CoreError::InvalidVocabulary(format!("duplicate entry {:?}", entry)));
            }
        }
        let unknown = match stored.unknown.as_deref() {
            Some(entry) => Some(indices.get(entry).copied().ok_or_else(|| {
                CoreError::InvalidVocabulary(format!("unknown entry {:?} is not an entry", entry))
            })?),
            None => None,
        };
        Ok(Self {
            entries: stored.entries,
            indices,
            frozen: stored.frozen,
            unknown,
        })
    }
}

impl From<Vocabulary> for StoredVocabulary {
    fn from(vocabulary: Vocabulary) -> Self {
        let unknown = vocabulary
            .unknown
            .and_then(|index| vocabulary.entries.get(index).cloned());
        Self {
            entries: vocabulary.entries,
            frozen: vocabulary.frozen,
            unknown,
        }
    }
}

/// Feature and label vocabularies, persisted as one unit.
///
/// Classifier weights are laid out by these indices, so a reloaded model
/// must reproduce them exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureModel {
    features: Vocabulary,
    labels: Vocabulary,
}

impl FeatureModel {
    pub fn new(features: Vocabulary, labels: Vocabulary) -> Self {
        Self { features, labels }
    }

    pub fn features(&self) -> &Vocabulary {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut Vocabulary {
        &mut self.features
    }

    /// Replace the feature vocabulary.
    pub fn with_features(mut self, features: Vocabulary) -> Self {
        self.features = features;
        self
    }

    pub fn labels(&self) -> &Vocabulary {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut Vocabulary {
        &mut self.labels
    }

    /// Replace the label vocabulary.
    pub fn with_labels(mut self, labels: Vocabulary) -> Self {
        self.labels = labels;
        self
    }

    /// Label stored at `index`.
    pub fn label(&self, index: usize) -> CoreResult<&str> {
        self.labels.string_of(index)
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.index_of(label)
    }

    /// Feature stored at `index`.
    pub fn feature(&self, index: usize) -> CoreResult<&str> {
        self.features.string_of(index)
    }

    pub fn feature_index(&self, feature: &str) -> Option<usize> {
        self.features.index_of(feature)
    }

    /// Freeze both vocabularies for inference.
    pub fn freeze(&mut self) {
        self.features.freeze();
        self.labels.freeze();
        tracing::info!(
            features = self.features.len(),
            labels = self.labels.len(),
            "feature model frozen"
        );
    }

    pub fn is_frozen(&self) -> bool {
        self.features.is_frozen() && self.labels.is_frozen()
    }

    /// Serialize to a pretty RON string.
    pub fn to_ron_string(&self) -> CoreResult<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from a RON string.
    pub fn from_ron_string(s: &str) -> CoreResult<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Write the model to `path`.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        fs::write(path, self.to_ron_string()?)?;
        tracing::debug!(path = %path.display(), "saved feature model");
        Ok(())
    }

    /// Read a model written by [`FeatureModel::save`].
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_string(&content)
    }
}
