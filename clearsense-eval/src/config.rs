//! Cross-validation settings loaded from TOML.

use crate::errors::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How instances are split into folds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidationConfig {
    /// Number of folds; every instance is tested in exactly one of them.
    pub num_folds: usize,
    /// Share of each fold's training complement actually used for training.
    pub sampling_ratio: f64,
    /// Seed for the instance shuffle.
    pub seed: u64,
    /// Deal each label's instances round-robin across folds.
    pub stratified: bool,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            num_folds: 5,
            sampling_ratio: 0.8,
            seed: 0,
            stratified: false,
        }
    }
}

impl CrossValidationConfig {
    pub fn new(num_folds: usize, sampling_ratio: f64) -> Self {
        Self {
            num_folds,
            sampling_ratio,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> EvalResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_error = |message: String| EvalError::Config {
            path: path.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = toml::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EvalResult<()> {
        if self.num_folds < 2 {
            return Err(EvalError::InvalidFolds {
                message: format!("need at least 2 folds, got {}", self.num_folds),
            });
        }
        if !(self.sampling_ratio > 0.0 && self.sampling_ratio <= 1.0) {
            return Err(EvalError::InvalidFolds {
                message: format!("sampling ratio {} outside (0, 1]", self.sampling_ratio),
            });
        }
        Ok(())
    }
}
