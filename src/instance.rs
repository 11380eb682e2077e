//! Classification instances.

use crate::tree::{FeatureKey, ParsedTree, Token};
use std::collections::HashMap;
use std::sync::Arc;

/// Anything that may carry a gold label.
pub trait Labeled {
    fn label(&self) -> Option<&str>;
}

/// A focus token within a shared parsed tree.
///
/// Several instances may point at the same tree, one per labeled focus.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusInstance {
    /// Ordinal of this instance within its corpus
    pub index: usize,
    /// Index of the focus token in the tree
    pub focus: usize,
    tree: Arc<ParsedTree>,
    features: HashMap<FeatureKey, String>,
}

impl FocusInstance {
    /// Create an instance; `None` if `focus` is not a token of `tree`.
    pub fn new(index: usize, focus: usize, tree: Arc<ParsedTree>) -> Option<Self> {
        if focus >= tree.len() {
            return None;
        }
        Some(Self {
            index,
            focus,
            tree,
            features: HashMap::new(),
        })
    }

    pub fn tree(&self) -> &ParsedTree {
        &self.tree
    }

    /// Shared handle to the containing tree.
    pub fn shared_tree(&self) -> &Arc<ParsedTree> {
        &self.tree
    }

    /// Returns true if both instances point at the same tree allocation.
    pub fn shares_tree_with(&self, other: &FocusInstance) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree)
    }

    pub fn focus_token(&self) -> &Token {
        &self.tree.tokens()[self.focus]
    }

    pub fn add_feature(&mut self, key: FeatureKey, value: impl Into<String>) {
        self.features.insert(key, value.into());
    }

    /// Add a feature, builder style.
    pub fn with_feature(mut self, key: FeatureKey, value: impl Into<String>) -> Self {
        self.add_feature(key, value);
        self
    }

    pub fn feature(&self, key: &FeatureKey) -> Option<&str> {
        self.features.get(key).map(String::as_str)
    }
}

impl Labeled for FocusInstance {
    fn label(&self) -> Option<&str> {
        self.feature(&FeatureKey::Gold)
    }
}

/// A sparse feature vector; indices are strictly increasing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build a vector from `(index, value)` pairs.
    ///
    /// Pairs are sorted by index and duplicate indices are summed.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(index, _)| index);
        let mut vector = Self::default();
        for (index, value) in pairs {
            match vector.indices.last() {
                Some(&last) if last == index => {
                    if let Some(previous) = vector.values.last_mut() {
                        *previous += value;
                    }
                }
                _ => {
                    vector.indices.push(index);
                    vector.values.push(value);
                }
            }
        }
        vector
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Value at `index`, 0.0 if absent.
    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|position| self.values[position])
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight vector; indices past its end count as 0.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.indices
            .iter()
            .zip(&self.values)
            .filter_map(|(&index, value)| weights.get(index).map(|w| w * value))
            .sum()
    }
}

/// A vectorized instance: identifier, target label index and features.
#[derive(Debug, Clone, PartialEq)]
pub struct StringInstance {
    pub id: usize,
    /// Index into the label vocabulary, `None` when unlabeled
    pub target: Option<usize>,
    /// Label string the target was derived from
    pub label: Option<String>,
    pub vector: SparseVector,
}

impl Labeled for StringInstance {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
