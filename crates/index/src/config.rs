//! Band layout and error types for the LSH index.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a signature is cut into bands.
///
/// Band `i` covers signature entries `[i * rows_per_band, (i + 1) * rows_per_band)`.
/// Entries past `bands * rows_per_band` take part in no band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BandLayout {
    pub bands: usize,
    pub rows_per_band: usize,
}

impl BandLayout {
    pub fn new(bands: usize, rows_per_band: usize) -> Self {
        Self {
            bands,
            rows_per_band,
        }
    }

    /// Set the number of bands.
    /// More bands = higher recall. Fewer bands = fewer false candidates.
    pub fn with_bands(mut self, bands: usize) -> Self {
        self.bands = bands;
        self
    }

    /// Set the number of signature entries per band.
    pub fn with_rows_per_band(mut self, rows: usize) -> Self {
        self.rows_per_band = rows;
        self
    }

    /// Signature entries consumed by all bands together.
    pub fn covered_rows(&self) -> usize {
        self.bands.saturating_mul(self.rows_per_band)
    }

    /// Signature entries of a `signature_len` signature that fall in no band.
    pub fn unused_rows(&self, signature_len: usize) -> usize {
        signature_len.saturating_sub(self.covered_rows())
    }

    /// Validate the layout against the signature length it will cut.
    pub fn validate(&self, signature_len: usize) -> Result<(), IndexError> {
        if self.bands == 0 {
            return Err(IndexError::InvalidConfiguration(
                "bands must be >= 1".into(),
            ));
        }
        if self.rows_per_band == 0 {
            return Err(IndexError::InvalidConfiguration(
                "rows_per_band must be >= 1".into(),
            ));
        }
        if self.covered_rows() > signature_len {
            return Err(IndexError::InvalidConfiguration(format!(
                "{} bands x {} rows need {} signature entries, signature has {signature_len}",
                self.bands,
                self.rows_per_band,
                self.covered_rows()
            )));
        }
        Ok(())
    }
}

impl Default for BandLayout {
    fn default() -> Self {
        Self {
            bands: 4,
            rows_per_band: 3,
        }
    }
}

/// Errors returned by the LSH index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("signature length mismatch: expected {expected}, got {got}")]
    SignatureLength { expected: usize, got: usize },
    #[error("customer {0} is indexed more than once")]
    DuplicateCustomer(String),
    #[error("customer {0} is not in the index")]
    UnknownCustomer(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid_for_twelve_rows() {
        let layout = BandLayout::default();
        assert_eq!(layout.covered_rows(), 12);
        assert!(layout.validate(12).is_ok());
        assert!(layout.validate(11).is_err());
    }

    #[test]
    fn zero_bands_or_rows_rejected() {
        assert!(matches!(
            BandLayout::new(0, 2).validate(10),
            Err(IndexError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BandLayout::new(2, 0).validate(10),
            Err(IndexError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn remainder_rows_are_counted() {
        let layout = BandLayout::new(3, 3);
        assert!(layout.validate(10).is_ok());
        assert_eq!(layout.unused_rows(10), 1);
        assert_eq!(layout.unused_rows(9), 0);
    }

    #[test]
    fn builder_chain() {
        let layout = BandLayout::default().with_bands(8).with_rows_per_band(2);
        assert_eq!(layout, BandLayout::new(8, 2));
    }

    #[test]
    fn layout_serde_fills_defaults() {
        let layout: BandLayout = serde_json::from_str(r#"{"bands": 6}"#).unwrap();
        assert_eq!(layout, BandLayout::new(6, 3));
    }
}
