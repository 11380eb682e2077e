//! Vectorization of focus instances through a [`FeatureModel`].

use super::function::{ContextFeatureExtractor, StringFeature};
use crate::errors::CoreResult;
use crate::instance::{FocusInstance, Labeled, SparseVector, StringInstance};
use crate::vocabulary::FeatureModel;

/// Turns focus instances into indexed sparse vectors.
///
/// Training (`fit`, `index`) takes `&mut self` and grows the model; once the
/// model is frozen, `transform` is read-only and may be shared across threads.
#[derive(Debug)]
pub struct FeaturePipeline {
    extractors: Vec<ContextFeatureExtractor>,
    model: FeatureModel,
}

impl FeaturePipeline {
    pub fn new(extractors: Vec<ContextFeatureExtractor>) -> Self {
        Self::with_model(extractors, FeatureModel::default())
    }

    /// Use an existing (possibly reloaded) model.
    pub fn with_model(extractors: Vec<ContextFeatureExtractor>, model: FeatureModel) -> Self {
        Self { extractors, model }
    }

    pub fn model(&self) -> &FeatureModel {
        &self.model
    }

    pub fn into_model(self) -> FeatureModel {
        self.model
    }

    /// String features of `instance` from every extractor, in order.
    pub fn extract(&self, instance: &FocusInstance) -> Vec<StringFeature> {
        self.extractors
            .iter()
            .flat_map(|extractor| extractor.apply(instance))
            .collect()
    }

    /// Vectorize one instance, growing the vocabularies with unseen entries.
    ///
    /// A frozen vocabulary is never grown: on a frozen model this is the
    /// same as [`transform`](Self::transform).
    pub fn index(&mut self, instance: &FocusInstance) -> CoreResult<StringInstance> {
        if self.model.features().is_frozen() && self.model.labels().is_frozen() {
            return Ok(self.transform(instance));
        }
        let mut pairs = Vec::new();
        for feature in self.extract(instance) {
            let key = feature.key();
            let features = self.model.features_mut();
            let index = if features.is_frozen() {
                features.index_of(&key)
            } else {
                Some(features.index_or_insert(&key)?)
            };
            pairs.extend(index.map(|index| (index, 1.0)));
        }
        let label = instance.label().map(String::from);
        let target = match &label {
            Some(label) if self.model.labels().is_frozen() => self.model.labels().resolve(label).ok(),
            Some(label) => Some(self.model.labels_mut().index_or_insert(label)?),
            None => None,
        };
        Ok(StringInstance {
            id: instance.index,
            target,
            label,
            vector: SparseVector::from_pairs(pairs),
        })
    }

    /// Index all training instances in order, then freeze the model.
    pub fn fit(&mut self, instances: &[FocusInstance]) -> CoreResult<Vec<StringInstance>> {
        let vectors = instances
            .iter()
            .map(|instance| self.index(instance))
            .collect::<CoreResult<Vec<_>>>()?;
        self.model.freeze();
        Ok(vectors)
    }

    /// Vectorize without touching the model.
    ///
    /// Features missing from the vocabulary are dropped; a label missing
    /// from the vocabulary maps to the unknown label if one is reserved and
    /// leaves `target` empty otherwise.
    pub fn transform(&self, instance: &FocusInstance) -> StringInstance {
        let pairs = self
            .extract(instance)
            .iter()
            .filter_map(|feature| self.model.feature_index(&feature.key()))
            .map(|index| (index, 1.0))
            .collect();
        let label = instance.label().map(String::from);
        let target = label
            .as_deref()
            .and_then(|label| self.model.labels().resolve(label).ok());
        StringInstance {
            id: instance.index,
            target,
            label,
            vector: SparseVector::from_pairs(pairs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::context::{HeadContext, OffsetContext};
    use crate::features::extractor::LookupExtractor;
    use crate::tree::{FeatureKey, ParsedTree, Token};
    use crate::vocabulary::Vocabulary;
    use std::sync::Arc;

    fn instance(index: usize, words: &[&str], focus: usize, label: Option<&str>) -> FocusInstance {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let token = Token::new(i, *w);
                if i == focus {
                    token
                } else {
                    token.with_head(focus)
                }
            })
            .collect();
        let tree = Arc::new(ParsedTree::new(index, tokens, focus));
        let mut instance = FocusInstance::new(index, focus, tree).unwrap();
        if let Some(label) = label {
            instance.add_feature(FeatureKey::Gold, label);
        }
        instance
    }

    fn extractors() -> Vec<ContextFeatureExtractor> {
        vec![ContextFeatureExtractor::new()
            .context(OffsetContext::new([-1, 1]))
            .context(HeadContext)
            .extractor(LookupExtractor::new(FeatureKey::Text))]
    }

    fn pipeline() -> FeaturePipeline {
        FeaturePipeline::new(extractors())
    }

    #[test]
    fn test_fit_assigns_indices_in_encounter_order() {
        let mut pipeline = pipeline();
        let train = vec![
            instance(0, &["dogs", "run", "fast"], 1, Some("run.01")),
            instance(1, &["they", "run", "shops"], 1, Some("run.02")),
            instance(2, &["dogs", "run", "home"], 1, Some("run.01")),
        ];
        let vectors = pipeline.fit(&train).unwrap();

        let model = pipeline.model();
        assert!(model.is_frozen());
        let features: Vec<_> = model.features().iter().map(|(_, f)| f.to_string()).collect();
        assert_eq!(
            features,
            vec![
                "tok[-1]_text=dogs",
                "tok[1]_text=fast",
                "tok[-1]_text=they",
                "tok[1]_text=shops",
                "tok[1]_text=home",
            ]
        );
        assert_eq!(vectors[2].vector.indices(), &[0, 4]);
        assert_eq!(vectors.iter().map(|v| v.target).collect::<Vec<_>>(), vec![Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_transform_is_read_only() {
        let mut pipeline = pipeline();
        pipeline
            .fit(&[instance(0, &["dogs", "run", "fast"], 1, Some("run.01"))])
            .unwrap();
        let before = pipeline.model().clone();

        let vector = pipeline.transform(&instance(7, &["cats", "run", "fast"], 1, Some("run.99")));
        assert_eq!(pipeline.model(), &before);
        assert_eq!(vector.id, 7);
        assert_eq!(vector.vector.indices(), &[1]);
        assert_eq!(vector.target, None);
        assert_eq!(vector.label.as_deref(), Some("run.99"));
    }

    #[test]
    fn test_reloaded_model_vectorizes_identically() {
        let mut pipeline = pipeline();
        let sample = instance(0, &["dogs", "run", "fast"], 1, Some("run.01"));
        let trained = pipeline.fit(std::slice::from_ref(&sample)).unwrap();

        let model = FeatureModel::from_ron_string(&pipeline.model().to_ron_string().unwrap()).unwrap();
        let reloaded = FeaturePipeline::with_model(extractors(), model);
        assert_eq!(reloaded.transform(&sample), trained[0]);
    }

    #[test]
    fn test_unknown_label_on_frozen_model() {
        let model = FeatureModel::new(Vocabulary::new(), Vocabulary::with_unknown("<unk>"));
        let mut pipeline = FeaturePipeline::with_model(vec![], model);
        pipeline.fit(&[instance(0, &["a"], 0, Some("x"))]).unwrap();
        let vector = pipeline.transform(&instance(1, &["b"], 0, Some("y")));
        assert_eq!(vector.target, Some(0));
        assert!(pipeline.index(&instance(2, &["c"], 0, Some("z"))).is_ok());
        assert_eq!(pipeline.model().labels().len(), 2);
    }

    #[test]
    fn test_index_matches_transform_once_frozen() {
        for features in [Vocabulary::new(), Vocabulary::with_unknown("<unk>")] {
            let model = FeatureModel::new(features, Vocabulary::new());
            let mut pipeline = FeaturePipeline::with_model(extractors(), model);
            pipeline
                .fit(&[instance(0, &["dogs", "run", "fast"], 1, Some("run.01"))])
                .unwrap();
            let before = pipeline.model().clone();

            let unseen = instance(3, &["cats", "run", "slowly"], 1, Some("run.02"));
            let inferred = pipeline.transform(&unseen);
            assert_eq!(pipeline.index(&unseen).unwrap(), inferred);
            assert!(inferred.vector.is_empty());
            assert_eq!(pipeline.model(), &before);

            // a second fit over already-seen data reproduces the first
            let seen = instance(0, &["dogs", "run", "fast"], 1, Some("run.01"));
            assert_eq!(pipeline.fit(std::slice::from_ref(&seen)).unwrap()[0], pipeline.transform(&seen));
        }
    }
}
