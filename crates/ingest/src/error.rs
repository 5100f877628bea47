//! Error types produced by the ingest crate.
//!
//! | Error | Description |
//! |-------|-------------|
//! | [`InvalidDate`](IngestError::InvalidDate) | A date string is not in a supported format |
//! | [`MissingCustomerId`](IngestError::MissingCustomerId) | A record has a blank customer id |
//! | [`NonFiniteValue`](IngestError::NonFiniteValue) | An amount or balance is NaN or infinite |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | Cleansing configuration is inconsistent |
use thiserror::Error;

/// Errors that can occur while cleansing or aggregating transactions.
///
/// The enum is marked `#[non_exhaustive]`; callers should keep a catch-all arm.
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::InvalidDate("31/02/99".to_string());
/// assert_eq!(err.to_string(), "invalid date: 31/02/99");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// A date field could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A record carries an empty or whitespace-only customer id.
    #[error("transaction record {row} has no customer id")]
    MissingCustomerId { row: usize },

    /// An amount or balance is NaN or infinite.
    #[error("transaction record {row} has non-finite {field}")]
    NonFiniteValue { row: usize, field: &'static str },

    /// Cleansing configuration is inconsistent.
    #[error("invalid cleanse config: {0}")]
    InvalidConfig(String),
}
