//! custsim Ingest Layer
//!
//! Raw bank transactions enter the pipeline here. We cleanse birth dates,
//! then reduce the rows into one [`CustomerProfile`] per customer for the
//! feature stage.
//!
//! ## What we do here
//!
//! - **Parse dates** - Day-first dataset dates with two- or four-digit years.
//! - **Cleanse** - Drop sentinel birth years, repair century-shifted ones.
//! - **Aggregate** - Sum, mean, majority location, age, last balance.
//! - **Log** - Structured logs via tracing for every stage.
//!
//! Reading the dataset from disk is the caller's job: records arrive as typed
//! [`TransactionRecord`] values (serde-deserializable from the dataset's
//! column names).
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ingest::{ingest_transactions, CleanseConfig, TransactionRecord};
//!
//! let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
//! let day = NaiveDate::from_ymd_opt(2016, 8, 2).unwrap();
//! let records = vec![TransactionRecord {
//!     customer_id: "C1".into(),
//!     transaction_date: day,
//!     amount: 250.0,
//!     account_balance: 12_000.0,
//!     customer_dob: dob,
//!     location: "MUMBAI".into(),
//! }];
//!
//! let as_of = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let batch = ingest_transactions(records, &CleanseConfig::default(), as_of).unwrap();
//!
//! assert_eq!(batch.profiles.len(), 1);
//! assert_eq!(batch.profiles[0].most_common_location.as_deref(), Some("MUMBAI"));
//! ```
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, warn, Level};

mod aggregate;
mod cleanse;
mod config;
mod dates;
mod error;
mod types;

pub use crate::aggregate::{age_at, aggregate, most_common_location};
pub use crate::cleanse::cleanse;
pub use crate::config::CleanseConfig;
pub use crate::dates::parse_record_date;
pub use crate::error::IngestError;
pub use crate::types::{CleanseReport, CustomerProfile, TransactionRecord};

/// Output of [`ingest_transactions`].
///
/// The cleansed rows are kept alongside the profiles because the feature
/// binners take their reference ranges from the transaction-level columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestBatch {
    pub transactions: Vec<TransactionRecord>,
    pub profiles: Vec<CustomerProfile>,
    pub report: CleanseReport,
}

/// Cleanse raw transactions and aggregate them into customer profiles.
pub fn ingest_transactions(
    records: Vec<TransactionRecord>,
    cfg: &CleanseConfig,
    as_of: NaiveDate,
) -> Result<IngestBatch, IngestError> {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "ingest.transactions", as_of = %as_of);
    let _guard = span.enter();

    let result = cleanse(records, cfg).and_then(|(transactions, report)| {
        let profiles = aggregate(&transactions, as_of)?;
        Ok(IngestBatch {
            transactions,
            profiles,
            report,
        })
    });

    let elapsed_micros = start.elapsed().as_micros();
    match &result {
        Ok(batch) => info!(
            transactions = batch.transactions.len(),
            customers = batch.profiles.len(),
            elapsed_micros,
            "ingest_success"
        ),
        Err(err) => warn!(error = %err, elapsed_micros, "ingest_failure"),
    }
    result
}
