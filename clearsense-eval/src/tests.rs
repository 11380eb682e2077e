use crate::{
    Classifier, CrossValidatingFitness, CrossValidationConfig, EvalError, FitnessFunction,
    MostFrequentLabel, Predictor, TrainError,
};
use clearsense::{FeatureKey, FocusInstance, Labeled, SpanTracker, UnicodeParser};
use std::io::Write;
use std::sync::Arc;

const TEXT: &str = "\
They run fast.
Dogs run home.
We run the shop.
Birds fly south.
You run late.
Planes fly low.
Kids run around.
Time flies by.
I run daily.
Bees fly away.";

/// One instance per sentence, focused on its verb.
fn instances() -> Vec<FocusInstance> {
    let trees = SpanTracker::new(UnicodeParser).anchor(TEXT).unwrap();
    trees
        .into_iter()
        .enumerate()
        .map(|(index, tree)| {
            let verb = tree.get(1).unwrap();
            let lemma = if verb.text().starts_with('f') { "fly" } else { "run" };
            let label = format!("{}.0{}", lemma, 1 + index % 2);
            let tree = Arc::new(tree);
            FocusInstance::new(index, 1, tree)
                .unwrap()
                .with_feature(FeatureKey::Predicate, lemma)
                .with_feature(FeatureKey::Gold, label)
        })
        .collect()
}

fn by_predicate() -> MostFrequentLabel<FocusInstance> {
    MostFrequentLabel::keyed(|i: &FocusInstance| i.feature(&FeatureKey::Predicate).map(String::from))
}

/// Fails to train on any fold whose training set contains `poison`.
struct Poisoned {
    poison: usize,
}

impl Classifier<FocusInstance> for Poisoned {
    type Model = Constant;

    fn train(&self, instances: &[FocusInstance]) -> Result<Constant, TrainError> {
        if instances.iter().any(|i| i.index == self.poison) {
            return Err(format!("instance {} is poisoned", self.poison).into());
        }
        Ok(Constant)
    }
}

struct Constant;

impl Predictor<FocusInstance> for Constant {
    fn predict(&self, _: &FocusInstance) -> Result<String, TrainError> {
        Ok("run.01".to_string())
    }
}

#[test]
fn test_ten_instances_five_folds() {
    let data = instances();
    assert_eq!(data.len(), 10);

    let mut fitness = CrossValidatingFitness::new(CrossValidationConfig::new(5, 0.8));
    fitness.initialize(&data).unwrap();
    let folds = fitness.folds().unwrap();
    assert_eq!(folds.len(), 5);

    let mut tested: Vec<usize> = folds
        .iter()
        .flat_map(|f| f.test.iter().map(|i| i.index))
        .collect();
    tested.sort_unstable();
    assert_eq!(tested, (0..10).collect::<Vec<_>>());

    let score = fitness.apply(&by_predicate()).unwrap();
    assert!((0.0..=1.0).contains(&score), "fitness {}", score);
}

#[test]
fn test_repeated_apply_is_stable() {
    let mut fitness = CrossValidatingFitness::new(CrossValidationConfig::default());
    fitness.initialize(&instances()).unwrap();
    let before: Vec<_> = fitness
        .folds()
        .unwrap()
        .iter()
        .map(|f| f.test.iter().map(|i| i.index).collect::<Vec<_>>())
        .collect();

    let first = fitness.apply(&by_predicate()).unwrap();
    let second = fitness.apply(&by_predicate()).unwrap();
    assert_eq!(first, second);

    let after: Vec<_> = fitness
        .folds()
        .unwrap()
        .iter()
        .map(|f| f.test.iter().map(|i| i.index).collect::<Vec<_>>())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_fold_failure_aborts_fitness() {
    let mut fitness = CrossValidatingFitness::new(CrossValidationConfig::new(5, 1.0));
    fitness.initialize(&instances()).unwrap();
    match fitness.apply(&Poisoned { poison: 3 }) {
        Err(EvalError::Training { source, .. }) => {
            assert_eq!(source.to_string(), "instance 3 is poisoned")
        }
        other => panic!("expected a training failure, got {:?}", other),
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let mut fitness = CrossValidatingFitness::new(CrossValidationConfig::new(5, 0.8).with_seed(3));
    fitness.initialize(&instances()).unwrap();

    let candidates = vec![by_predicate(), MostFrequentLabel::new(), by_predicate()];
    let parallel: Vec<f64> = fitness
        .apply_all(&candidates)
        .into_iter()
        .map(Result::unwrap)
        .collect();
    let sequential: Vec<f64> = candidates
        .iter()
        .map(|c| fitness.apply(c).unwrap())
        .collect();
    assert_eq!(parallel, sequential);
    assert_eq!(parallel[0], parallel[2]);
}

#[test]
fn test_merged_report_covers_all_instances() {
    let mut fitness = CrossValidatingFitness::new(CrossValidationConfig::new(5, 1.0));
    fitness.initialize(&instances()).unwrap();
    let evaluation = fitness.evaluate(&by_predicate()).unwrap();
    assert_eq!(evaluation.total(), 10);
    assert_eq!(evaluation.f1(), fitness.apply(&by_predicate()).unwrap());
    let report = evaluation.to_string();
    assert!(report.lines().next().unwrap().starts_with("label"));
    assert!(report.contains("micro"));
}

#[test]
fn test_config_file_drives_folds() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "num_folds = 2\nsampling_ratio = 1.0\nseed = 11").unwrap();
    let config = CrossValidationConfig::load(file.path()).unwrap();

    let mut fitness = CrossValidatingFitness::new(config);
    fitness.initialize(&instances()).unwrap();
    let folds = fitness.folds().unwrap();
    assert_eq!(folds.len(), 2);
    assert!(folds.iter().all(|f| f.test.len() == 5 && f.train.len() == 5));
    assert!(folds[0].test.iter().all(|i| i.label().is_some()));
}
