//! Configuration and error types for the feature stage.
//!
//! Bin counts are plain configuration. Nothing here infers them from the
//! data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of ordinal bins per binned attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BinningConfig {
    /// Bins for the income class (last account balance).
    pub income_bins: usize,
    /// Bins for the transaction class (average transaction amount).
    pub transaction_bins: usize,
    /// Bins for the age class.
    pub age_bins: usize,
}

impl BinningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_income_bins(mut self, bins: usize) -> Self {
        self.income_bins = bins;
        self
    }

    pub fn with_transaction_bins(mut self, bins: usize) -> Self {
        self.transaction_bins = bins;
        self
    }

    pub fn with_age_bins(mut self, bins: usize) -> Self {
        self.age_bins = bins;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), FeatureError> {
        for (feature, bins) in [
            ("income", self.income_bins),
            ("transaction", self.transaction_bins),
            ("age", self.age_bins),
        ] {
            if bins == 0 {
                return Err(FeatureError::InvalidBinCount {
                    feature: feature.to_string(),
                    bins,
                });
            }
        }
        Ok(())
    }
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            income_bins: 5,
            transaction_bins: 5,
            age_bins: 5,
        }
    }
}

/// Errors returned by binning and feature extraction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    #[error("invalid binning for {feature}: bin count must be >= 1 (got {bins})")]
    InvalidBinCount { feature: String, bins: usize },

    #[error("invalid binning range for {feature}: lower={lower} upper={upper}")]
    InvalidRange {
        feature: String,
        lower: f64,
        upper: f64,
    },

    #[error("non-finite value for {feature}")]
    NonFiniteValue { feature: String },

    #[error("no reference values to derive the {feature} range from")]
    EmptyReference { feature: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = BinningConfig::default();
        assert_eq!(cfg.income_bins, 5);
        assert_eq!(cfg.transaction_bins, 5);
        assert_eq!(cfg.age_bins, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let cfg = BinningConfig::new()
            .with_income_bins(4)
            .with_transaction_bins(6)
            .with_age_bins(8);
        assert_eq!(cfg.income_bins, 4);
        assert_eq!(cfg.transaction_bins, 6);
        assert_eq!(cfg.age_bins, 8);
    }

    #[test]
    fn config_validate_rejects_zero_bins() {
        let cfg = BinningConfig::new().with_age_bins(0);
        assert_eq!(
            cfg.validate(),
            Err(FeatureError::InvalidBinCount {
                feature: "age".into(),
                bins: 0
            })
        );
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = BinningConfig::new().with_income_bins(7);
        let serialized = serde_json::to_string(&cfg).unwrap();
        let deserialized: BinningConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn error_display_messages() {
        let err = FeatureError::InvalidBinCount {
            feature: "income".into(),
            bins: 0,
        };
        assert!(err.to_string().contains("bin count must be >= 1"));

        let err = FeatureError::EmptyReference {
            feature: "age".into(),
        };
        assert!(err.to_string().contains("age"));
    }
}
