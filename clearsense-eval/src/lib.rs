//! Cross-validated fitness scoring for clearsense classifiers.
//!
//! Labeled instances are partitioned once into reproducible folds; each
//! candidate classifier is then trained and tested on every fold and scored
//! by the micro-averaged F1 of the merged counts.
//!
//! ## Core Types
//!
//! - [`CrossValidationConfig`] - Fold count, sampling ratio and seed
//! - [`CrossValidation`] / [`Fold`] - Fold construction and per-fold evaluation
//! - [`Evaluation`] - Per-label confusion counts and scores
//! - [`Classifier`] / [`Predictor`] - Training and prediction seams
//! - [`CrossValidatingFitness`] - The [`FitnessFunction`] handed to an optimizer
//!
//! ## Example
//!
//! ```
//! use clearsense::Labeled;
//! use clearsense_eval::{CrossValidatingFitness, CrossValidationConfig, FitnessFunction, MostFrequentLabel};
//!
//! #[derive(Clone)]
//! struct Sense(&'static str);
//!
//! impl Labeled for Sense {
//!     fn label(&self) -> Option<&str> {
//!         Some(self.0)
//!     }
//! }
//!
//! let data: Vec<Sense> = ["a", "a", "a", "b"].into_iter().cycle().take(12).map(Sense).collect();
//! let mut fitness = CrossValidatingFitness::new(CrossValidationConfig::new(3, 1.0));
//! fitness.initialize(&data).unwrap();
//! let score = fitness.apply(&MostFrequentLabel::<Sense>::new()).unwrap();
//! assert!((score - 0.75).abs() < 1e-9);
//! ```

mod classifier;
mod config;
mod cross_validation;
mod errors;
mod evaluation;
mod fitness;

pub use classifier::{Classifier, FrequencyModel, MostFrequentLabel, Predictor};
pub use config::CrossValidationConfig;
pub use cross_validation::{CrossValidation, Fold};
pub use errors::{EvalError, EvalResult, TrainError};
pub use evaluation::{Evaluation, LabelCounts};
pub use fitness::{CrossValidatingFitness, FitnessFunction};

#[cfg(test)]
mod tests;
