//! YAML Configuration File Support for custsim
//!
//! All stage configurations (ingest, features, signature, index, matcher) can
//! be kept in a single YAML file and loaded at runtime. Every section and
//! every field is optional; missing values take the stage defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # custsim Pipeline Configuration
//! version: "1.0"
//! name: "nightly"
//!
//! ingest:
//!   sentinel_birth_year: 1800
//!   century_shift_after: 2000
//!
//! features:
//!   income_bins: 5
//!   transaction_bins: 5
//!   age_bins: 5
//!   as_of: "2016-12-31"
//!
//! signature:
//!   num_hashes: 12
//!   seed: 42
//!   use_parallel: false
//!
//! index:
//!   bands: 4
//!   rows_per_band: 3
//!
//! matcher:
//!   max_results: 10
//!   min_score: 0.0
//! ```

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use features::BinningConfig;
use index::BandLayout;
use ingest::CleanseConfig;
use matcher::MatchConfig;
use minhash::SignatureConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PipelineSettings;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration structure for the whole pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CustsimConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ingest: IngestYamlConfig,

    #[serde(default)]
    pub features: FeaturesYamlConfig,

    #[serde(default)]
    pub signature: SignatureYamlConfig,

    #[serde(default)]
    pub index: IndexYamlConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,
}

impl CustsimConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CustsimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.cleanse_config()
            .validate()
            .map_err(|e| invalid("ingest", e))?;
        self.binning_config()
            .validate()
            .map_err(|e| invalid("features", e))?;
        let signature = self.signature_config();
        signature.validate().map_err(|e| invalid("signature", e))?;
        self.band_layout()
            .validate(signature.num_hashes)
            .map_err(|e| invalid("index", e))?;
        self.match_config()
            .validate()
            .map_err(|e| invalid("matcher", e))?;

        Ok(())
    }

    pub fn cleanse_config(&self) -> CleanseConfig {
        CleanseConfig::new()
            .with_sentinel_birth_year(self.ingest.sentinel_birth_year)
            .with_century_shift_after(self.ingest.century_shift_after)
    }

    pub fn binning_config(&self) -> BinningConfig {
        BinningConfig::new()
            .with_income_bins(self.features.income_bins)
            .with_transaction_bins(self.features.transaction_bins)
            .with_age_bins(self.features.age_bins)
    }

    pub fn signature_config(&self) -> SignatureConfig {
        let cfg = SignatureConfig::new()
            .with_num_hashes(self.signature.num_hashes)
            .with_seed(self.signature.seed)
            .with_parallel(self.signature.use_parallel);
        match self.signature.modulus {
            Some(modulus) => cfg.with_modulus(modulus),
            None => cfg,
        }
    }

    pub fn band_layout(&self) -> BandLayout {
        BandLayout::new(self.index.bands, self.index.rows_per_band)
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig::new()
            .with_max_results(self.matcher.max_results)
            .with_min_score(self.matcher.min_score)
    }

    /// Reference date for ages. Falls back to today's UTC date.
    pub fn as_of(&self) -> NaiveDate {
        self.features
            .as_of
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Per-stage settings for [`crate::SimilarityPipeline`].
    pub fn to_settings(&self) -> PipelineSettings {
        PipelineSettings {
            cleanse: self.cleanse_config(),
            binning: self.binning_config(),
            signature: self.signature_config(),
            layout: self.band_layout(),
            matcher: self.match_config(),
            as_of: self.as_of(),
        }
    }
}

fn invalid(section: &str, err: impl std::fmt::Display) -> ConfigLoadError {
    ConfigLoadError::Validation(format!("{section}: {err}"))
}

impl Default for CustsimConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ingest: IngestYamlConfig::default(),
            features: FeaturesYamlConfig::default(),
            signature: SignatureYamlConfig::default(),
            index: IndexYamlConfig::default(),
            matcher: MatchYamlConfig::default(),
        }
    }
}

/// Cleansing rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestYamlConfig {
    #[serde(default = "default_sentinel_birth_year")]
    pub sentinel_birth_year: i32,

    #[serde(default = "default_century_shift_after")]
    pub century_shift_after: i32,
}

impl Default for IngestYamlConfig {
    fn default() -> Self {
        Self {
            sentinel_birth_year: default_sentinel_birth_year(),
            century_shift_after: default_century_shift_after(),
        }
    }
}

/// Binning and the age reference date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeaturesYamlConfig {
    #[serde(default = "default_bins")]
    pub income_bins: usize,

    #[serde(default = "default_bins")]
    pub transaction_bins: usize,

    #[serde(default = "default_bins")]
    pub age_bins: usize,

    /// Ages are measured at this date. Today when absent.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl Default for FeaturesYamlConfig {
    fn default() -> Self {
        Self {
            income_bins: default_bins(),
            transaction_bins: default_bins(),
            age_bins: default_bins(),
            as_of: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureYamlConfig {
    #[serde(default = "default_num_hashes")]
    pub num_hashes: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub modulus: Option<u64>,

    #[serde(default)]
    pub use_parallel: bool,
}

impl Default for SignatureYamlConfig {
    fn default() -> Self {
        Self {
            num_hashes: default_num_hashes(),
            seed: default_seed(),
            modulus: None,
            use_parallel: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexYamlConfig {
    #[serde(default = "default_bands")]
    pub bands: usize,

    #[serde(default = "default_rows_per_band")]
    pub rows_per_band: usize,
}

impl Default for IndexYamlConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            rows_per_band: default_rows_per_band(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchYamlConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default)]
    pub min_score: f64,
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_score: 0.0,
        }
    }
}

// Helper functions for serde defaults
fn default_sentinel_birth_year() -> i32 {
    1800
}
fn default_century_shift_after() -> i32 {
    2000
}
fn default_bins() -> usize {
    5
}
fn default_num_hashes() -> usize {
    12
}
fn default_seed() -> u64 {
    42
}
fn default_bands() -> usize {
    4
}
fn default_rows_per_band() -> usize {
    3
}
fn default_max_results() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
features:
  age_bins: 4
  as_of: "2016-12-31"
signature:
  num_hashes: 16
  seed: 7
index:
  bands: 8
  rows_per_band: 2
"#;

        let config = CustsimConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.features.age_bins, 4);
        assert_eq!(config.features.income_bins, 5);
        assert_eq!(
            config.as_of(),
            NaiveDate::from_ymd_opt(2016, 12, 31).unwrap()
        );
        assert_eq!(config.signature_config().num_hashes, 16);
        assert_eq!(config.band_layout(), BandLayout::new(8, 2));
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1.0"
matcher:
  max_results: 3
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = CustsimConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.matcher.max_results, 3);
    }

    #[test]
    fn test_missing_file() {
        let result = CustsimConfig::from_file("/nonexistent/custsim.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_default_config() {
        let config = CustsimConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.to_settings().signature, SignatureConfig::default());
        assert_eq!(config.to_settings().layout, BandLayout::default());
    }

    #[test]
    fn test_unsupported_version() {
        let result = CustsimConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let yaml = r#"
version: "1.0"
features:
  income_bins: 0
"#;
        let err = CustsimConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("features"));
        assert!(err.to_string().contains("bin count must be >= 1"));
    }

    #[test]
    fn test_layout_must_fit_signature() {
        let yaml = r#"
version: "1.0"
signature:
  num_hashes: 6
index:
  bands: 4
  rows_per_band: 2
"#;
        let err = CustsimConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("index"));
    }

    #[test]
    fn test_min_score_out_of_range() {
        let yaml = r#"
version: "1.0"
matcher:
  min_score: 1.5
"#;
        assert!(CustsimConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = CustsimConfig::from_yaml("version: [unclosed");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }

    #[test]
    fn test_explicit_modulus_is_carried() {
        let yaml = r#"
version: "1"
signature:
  modulus: 101
"#;
        let config = CustsimConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.signature_config().modulus, Some(101));
    }
}
