//! Fold construction and per-fold evaluation.

use crate::classifier::{Classifier, Predictor};
use crate::config::CrossValidationConfig;
use crate::errors::{EvalError, EvalResult};
use crate::evaluation::Evaluation;
use clearsense::Labeled;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// One train/test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold<I> {
    pub index: usize,
    pub train: Vec<I>,
    pub test: Vec<I>,
}

/// Builds folds and runs a classifier over them.
#[derive(Debug, Clone, Default)]
pub struct CrossValidation {
    config: CrossValidationConfig,
}

impl CrossValidation {
    pub fn new(config: CrossValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrossValidationConfig {
        &self.config
    }

    /// Partition `instances` into folds.
    ///
    /// Every instance lands in exactly one test set. Each training set is a
    /// prefix of the shuffled complement of its test set, holding
    /// `ceil(sampling_ratio * |complement|)` instances. The result depends
    /// only on the instance order and the configuration.
    pub fn create_folds<I: Clone + Labeled>(&self, instances: &[I]) -> EvalResult<Vec<Fold<I>>> {
        self.config.validate()?;
        let k = self.config.num_folds;
        if instances.len() < k {
            return Err(EvalError::InvalidFolds {
                message: format!("{} instances cannot fill {} folds", instances.len(), k),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let (order, assignment) = if self.config.stratified {
            stratified_order(instances, k, &mut rng)
        } else {
            let mut order: Vec<usize> = (0..instances.len()).collect();
            order.shuffle(&mut rng);
            let n = order.len();
            let mut assignment = vec![0; n];
            for (position, &index) in order.iter().enumerate() {
                // contiguous blocks of the shuffled order
                assignment[index] = position * k / n;
            }
            (order, assignment)
        };

        let folds: Vec<Fold<I>> = (0..k)
            .map(|fold| {
                let mut test: Vec<usize> = order.iter().copied().filter(|&i| assignment[i] == fold).collect();
                let complement: Vec<usize> = order.iter().copied().filter(|&i| assignment[i] != fold).collect();
                let mut train = complement[..sample_size(complement.len(), self.config.sampling_ratio)].to_vec();
                test.sort_unstable();
                train.sort_unstable();
                Fold {
                    index: fold,
                    train: train.iter().map(|&i| instances[i].clone()).collect(),
                    test: test.iter().map(|&i| instances[i].clone()).collect(),
                }
            })
            .collect();

        tracing::info!(
            folds = folds.len(),
            instances = instances.len(),
            stratified = self.config.stratified,
            "created cross-validation folds"
        );
        Ok(folds)
    }

    /// Train on each fold and evaluate on its test set.
    ///
    /// A training or prediction failure on any fold aborts the whole run.
    /// Test instances without a gold label are not scored.
    pub fn cross_validate<I, C>(&self, classifier: &C, folds: &[Fold<I>]) -> EvalResult<Vec<Evaluation>>
    where
        I: Labeled,
        C: Classifier<I>,
    {
        folds
            .iter()
            .map(|fold| {
                let model = classifier
                    .train(&fold.train)
                    .map_err(|source| EvalError::Training {
                        fold: fold.index,
                        source,
                    })?;
                let mut evaluation = Evaluation::new();
                for instance in &fold.test {
                    let Some(gold) = instance.label() else {
                        continue;
                    };
                    let predicted = model.predict(instance).map_err(|source| EvalError::Prediction {
                        fold: fold.index,
                        source,
                    })?;
                    evaluation.add(gold, &predicted);
                }
                tracing::debug!(fold = fold.index, f1 = evaluation.f1(), "evaluated fold");
                Ok(evaluation)
            })
            .collect()
    }
}

/// Shuffle each label group, concatenate the groups and deal them round-robin.
fn stratified_order<I: Labeled>(instances: &[I], k: usize, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, instance) in instances.iter().enumerate() {
        groups.entry(instance.label().unwrap_or_default()).or_default().push(index);
    }

    let mut order = Vec::with_capacity(instances.len());
    for group in groups.values_mut() {
        group.shuffle(rng);
        order.extend_from_slice(group);
    }
    let mut assignment = vec![0; instances.len()];
    for (position, &index) in order.iter().enumerate() {
        assignment[index] = position % k;
    }
    (order, assignment)
}

fn sample_size(len: usize, ratio: f64) -> usize {
    // tolerate products like 0.7 * 10 landing just above an integer
    let size = (ratio * len as f64 - 1e-9).ceil().max(0.0) as usize;
    size.min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MostFrequentLabel;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: usize,
        label: String,
    }

    impl Labeled for Item {
        fn label(&self) -> Option<&str> {
            Some(self.label.as_str())
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|id| Item {
                id,
                label: if id % 3 == 0 { "b" } else { "a" }.to_string(),
            })
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<usize> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_every_instance_tested_once() {
        let cv = CrossValidation::new(CrossValidationConfig::new(5, 0.8));
        let folds = cv.create_folds(&items(10)).unwrap();
        assert_eq!(folds.len(), 5);

        let mut tested: Vec<usize> = folds.iter().flat_map(|f| ids(&f.test)).collect();
        tested.sort_unstable();
        assert_eq!(tested, (0..10).collect::<Vec<_>>());
        for fold in &folds {
            assert_eq!(fold.test.len(), 2);
            // ceil(0.8 * 8)
            assert_eq!(fold.train.len(), 7);
            assert!(fold.train.iter().all(|i| !fold.test.contains(i)));
        }
    }

    #[test]
    fn test_folds_are_repeatable() {
        let cv = CrossValidation::new(CrossValidationConfig::new(3, 0.5).with_seed(42));
        let data = items(11);
        assert_eq!(cv.create_folds(&data).unwrap(), cv.create_folds(&data).unwrap());

        let reseeded = CrossValidation::new(CrossValidationConfig::new(3, 0.5).with_seed(42));
        assert_eq!(reseeded.create_folds(&data).unwrap(), cv.create_folds(&data).unwrap());
    }

    #[test]
    fn test_full_ratio_trains_on_complement() {
        let cv = CrossValidation::new(CrossValidationConfig::new(4, 1.0));
        for fold in cv.create_folds(&items(8)).unwrap() {
            assert_eq!(fold.train.len() + fold.test.len(), 8);
        }
    }

    #[test]
    fn test_stratified_spreads_labels() {
        let config = CrossValidationConfig::new(3, 1.0).with_stratified(true);
        let folds = CrossValidation::new(config).create_folds(&items(9)).unwrap();
        for fold in &folds {
            let b = fold.test.iter().filter(|i| i.label == "b").count();
            assert_eq!(b, 1, "fold {} test {:?}", fold.index, ids(&fold.test));
            assert_eq!(fold.test.len(), 3);
        }
    }

    #[test]
    fn test_too_few_instances() {
        let cv = CrossValidation::new(CrossValidationConfig::new(5, 0.8));
        assert!(matches!(
            cv.create_folds(&items(3)),
            Err(EvalError::InvalidFolds { .. })
        ));
    }

    #[test]
    fn test_cross_validate_per_fold() {
        let cv = CrossValidation::default();
        let folds = cv.create_folds(&items(10)).unwrap();
        let evaluations = cv.cross_validate(&MostFrequentLabel::<Item>::new(), &folds).unwrap();
        assert_eq!(evaluations.len(), 5);
        assert_eq!(evaluations.iter().map(Evaluation::total).sum::<usize>(), 10);
    }

    #[test]
    fn test_sample_size() {
        assert_eq!(sample_size(8, 0.8), 7);
        assert_eq!(sample_size(10, 0.7), 7);
        assert_eq!(sample_size(10, 1.0), 10);
        assert_eq!(sample_size(0, 0.5), 0);
    }
}
