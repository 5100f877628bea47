use features::FeatureError;
use index::IndexError;
use minhash::MinHashError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result policy applied after exact scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Maximum number of hits to return. `0` returns every hit.
    #[serde(default = "MatchConfig::default_max_results")]
    pub max_results: usize,
    /// Hits scoring below this are dropped.
    #[serde(default)]
    pub min_score: f64,
}

impl MatchConfig {
    pub(crate) fn default_max_results() -> usize {
        10
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(MatchError::InvalidConfig(format!(
                "min_score must be within [0.0, 1.0] (got {})",
                self.min_score
            )));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_results: Self::default_max_results(),
            min_score: 0.0,
        }
    }
}

/// A single scored customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchHit {
    pub customer_id: String,
    /// Exact Jaccard similarity of the feature sets.
    pub score: f64,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// Invalid configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Feature extraction for a query failed.
    #[error("feature error: {0}")]
    Feature(#[from] FeatureError),
    /// Hash family generation failed.
    #[error("minhash error: {0}")]
    MinHash(#[from] MinHashError),
    /// Index build or lookup failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}
