//! Configuration and error types for MinHash signing.
//!
//! Nothing here reads the environment or the clock. Given the same config and
//! the same feature-index sets, signatures are bit-identical across runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters of the hash family and the signing pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SignatureConfig {
    /// Number of hash functions, which is also the signature length.
    ///
    /// Multipliers and offsets are drawn without replacement from
    /// `[0, universe_size]`, so this can never exceed `universe_size + 1`.
    pub num_hashes: usize,
    /// Seed for the parameter generator.
    pub seed: u64,
    /// Explicit modulus. When `None` the smallest prime above the universe
    /// size is used.
    pub modulus: Option<u64>,
    /// Sign customers on the rayon thread pool.
    pub use_parallel: bool,
}

impl SignatureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of hash functions (signature length).
    pub fn with_num_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = num_hashes;
        self
    }

    /// Set the random seed for reproducible parameters.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_modulus(mut self, modulus: u64) -> Self {
        self.modulus = Some(modulus);
        self
    }

    /// Enable or disable parallel signing.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters.
    ///
    /// Checks that depend on the universe size happen when the family is
    /// generated.
    pub fn validate(&self) -> Result<(), MinHashError> {
        if self.num_hashes == 0 {
            return Err(MinHashError::InvalidConfiguration(
                "num_hashes must be >= 1".into(),
            ));
        }
        if let Some(modulus) = self.modulus {
            if modulus < 2 {
                return Err(MinHashError::InvalidConfiguration(format!(
                    "modulus must be >= 2 (got {modulus})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            num_hashes: 12,
            seed: 42,
            modulus: None,
            use_parallel: false,
        }
    }
}

/// Errors produced while generating a hash family.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MinHashError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SignatureConfig::default();
        assert_eq!(cfg.num_hashes, 12);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.modulus, None);
        assert!(!cfg.use_parallel);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let cfg = SignatureConfig::new()
            .with_num_hashes(64)
            .with_seed(7)
            .with_modulus(101)
            .with_parallel(true);
        assert_eq!(cfg.num_hashes, 64);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.modulus, Some(101));
        assert!(cfg.use_parallel);
    }

    #[test]
    fn config_validate_rejects_zero_hashes() {
        let cfg = SignatureConfig::new().with_num_hashes(0);
        assert!(matches!(
            cfg.validate(),
            Err(MinHashError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn config_validate_rejects_tiny_modulus() {
        let cfg = SignatureConfig::new().with_modulus(1);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_serde_fills_defaults() {
        let cfg: SignatureConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.num_hashes, 12);
    }
}
