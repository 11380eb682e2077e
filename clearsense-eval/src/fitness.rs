//! Cross-validated fitness for an external optimizer.

use crate::classifier::Classifier;
use crate::config::CrossValidationConfig;
use crate::cross_validation::{CrossValidation, Fold};
use crate::errors::{EvalError, EvalResult};
use crate::evaluation::Evaluation;
use clearsense::Labeled;
use rayon::prelude::*;

/// Scores a candidate.
pub trait FitnessFunction<C> {
    fn apply(&self, candidate: &C) -> EvalResult<f64>;
}

/// Fitness as the micro-averaged F1 of cross-validation over fixed folds.
///
/// Folds are built once by [`initialize`](Self::initialize) and only read
/// afterwards, so `apply` may run concurrently for many candidates.
#[derive(Debug, Clone)]
pub struct CrossValidatingFitness<I> {
    cv: CrossValidation,
    folds: Option<Vec<Fold<I>>>,
}

impl<I: Clone + Labeled> CrossValidatingFitness<I> {
    pub fn new(config: CrossValidationConfig) -> Self {
        Self {
            cv: CrossValidation::new(config),
            folds: None,
        }
    }

    /// Build the folds used by every later call to `apply`.
    pub fn initialize(&mut self, instances: &[I]) -> EvalResult<()> {
        self.folds = Some(self.cv.create_folds(instances)?);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.folds.is_some()
    }

    pub fn folds(&self) -> Option<&[Fold<I>]> {
        self.folds.as_deref()
    }

    /// Counts from every fold, merged into one evaluation.
    pub fn evaluate<C: Classifier<I>>(&self, classifier: &C) -> EvalResult<Evaluation> {
        let folds = self.folds.as_deref().ok_or(EvalError::Uninitialized)?;
        let evaluations = self.cv.cross_validate(classifier, folds)?;
        Ok(evaluations.into_iter().collect())
    }

    /// Score candidates in parallel; results keep the candidates' order.
    pub fn apply_all<C>(&self, candidates: &[C]) -> Vec<EvalResult<f64>>
    where
        C: Classifier<I>,
        I: Sync,
    {
        let scores: Vec<_> = candidates.par_iter().map(|candidate| self.apply(candidate)).collect();
        tracing::info!(
            candidates = candidates.len(),
            failed = scores.iter().filter(|s| s.is_err()).count(),
            "scored population"
        );
        scores
    }
}

impl<I, C> FitnessFunction<C> for CrossValidatingFitness<I>
where
    I: Clone + Labeled,
    C: Classifier<I>,
{
    fn apply(&self, candidate: &C) -> EvalResult<f64> {
        let fitness = self.evaluate(candidate)?.f1();
        tracing::debug!(fitness, "computed fitness");
        Ok(fitness)
    }
}
