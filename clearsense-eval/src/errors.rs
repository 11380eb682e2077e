//! Error types for cross-validation and fitness scoring.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by classifier training and prediction.
pub type TrainError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building folds or scoring a classifier.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Fitness was requested before any folds were created.
    #[error("fitness function used before initialization")]
    Uninitialized,

    #[error("invalid fold configuration: {message}")]
    InvalidFolds { message: String },

    /// Training failed on one fold; the whole computation is abandoned.
    #[error("training failed on fold {fold}: {source}")]
    Training {
        fold: usize,
        #[source]
        source: TrainError,
    },

    #[error("prediction failed on fold {fold}: {source}")]
    Prediction {
        fold: usize,
        #[source]
        source: TrainError,
    },

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
