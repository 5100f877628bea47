//! Configuration for the cleansing pass.
//!
//! ```rust
//! use ingest::CleanseConfig;
//!
//! let config = CleanseConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.sentinel_birth_year, 1800);
//! ```
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Rules applied to customer birth dates before aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CleanseConfig {
    /// Birth year the data source uses for "unknown". Records carrying it are
    /// dropped.
    pub sentinel_birth_year: i32,
    /// Birth years strictly after this year are treated as two-digit-year
    /// misparses and moved back by 100 years.
    pub century_shift_after: i32,
}

impl CleanseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentinel_birth_year(mut self, year: i32) -> Self {
        self.sentinel_birth_year = year;
        self
    }

    pub fn with_century_shift_after(mut self, year: i32) -> Self {
        self.century_shift_after = year;
        self
    }

    /// Validate configuration parameters.
    ///
    /// A sentinel year above the shift threshold would be shifted instead of
    /// dropped, which is never what the caller wants.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.sentinel_birth_year > self.century_shift_after {
            return Err(IngestError::InvalidConfig(format!(
                "sentinel_birth_year ({}) must not exceed century_shift_after ({})",
                self.sentinel_birth_year, self.century_shift_after
            )));
        }
        Ok(())
    }
}

impl Default for CleanseConfig {
    fn default() -> Self {
        Self {
            sentinel_birth_year: 1800,
            century_shift_after: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = CleanseConfig::default();
        assert_eq!(cfg.sentinel_birth_year, 1800);
        assert_eq!(cfg.century_shift_after, 2000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let cfg = CleanseConfig::new()
            .with_sentinel_birth_year(1900)
            .with_century_shift_after(2010);
        assert_eq!(cfg.sentinel_birth_year, 1900);
        assert_eq!(cfg.century_shift_after, 2010);
    }

    #[test]
    fn config_validate_rejects_sentinel_above_threshold() {
        let cfg = CleanseConfig::new().with_sentinel_birth_year(2020);
        assert!(matches!(
            cfg.validate(),
            Err(IngestError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: CleanseConfig = serde_json::from_str(r#"{"century_shift_after": 2005}"#).unwrap();
        assert_eq!(cfg.sentinel_birth_year, 1800);
        assert_eq!(cfg.century_shift_after, 2005);
    }
}
