//! Core data model types for the ingest crate.
//!
//! ```text
//! TransactionRecord (one row per transaction)
//! ├── customer_id: String
//! ├── transaction_date: NaiveDate
//! ├── amount: f64
//! ├── account_balance: f64
//! ├── customer_dob: NaiveDate
//! └── location: String
//!
//!         ↓ cleanse() + aggregate()
//!
//! CustomerProfile (one row per customer)
//! ├── customer_id: String
//! ├── total_amount: f64
//! ├── average_amount: f64
//! ├── most_common_location: Option<String>
//! ├── age: i64
//! ├── last_balance: f64
//! └── transaction_count: usize
//! ```
//!
//! Field aliases accept the column headers used by the public bank
//! transaction dataset, so rows deserialized from that source map straight
//! onto [`TransactionRecord`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::deserialize_record_date;

/// A single bank transaction as it arrives from the data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Customer identifier shared by all transactions of one customer.
    #[serde(alias = "CustomerID")]
    pub customer_id: String,

    /// Day the transaction was booked.
    #[serde(alias = "TransactionDate", deserialize_with = "deserialize_record_date")]
    pub transaction_date: NaiveDate,

    /// Transaction amount in the account currency.
    #[serde(alias = "TransactionAmount (INR)")]
    pub amount: f64,

    /// Account balance reported alongside the transaction.
    #[serde(alias = "CustAccountBalance")]
    pub account_balance: f64,

    /// Customer date of birth. May carry the sentinel year or a century
    /// shift until [`crate::cleanse`] has run.
    #[serde(alias = "CustomerDOB", deserialize_with = "deserialize_record_date")]
    pub customer_dob: NaiveDate,

    /// Location where the transaction took place.
    #[serde(alias = "CustLocation")]
    pub location: String,
}

/// Aggregated per-customer profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    pub customer_id: String,
    /// Sum of all transaction amounts.
    pub total_amount: f64,
    /// Mean transaction amount.
    pub average_amount: f64,
    /// Most frequent transaction location.
    ///
    /// `None` when two or more locations share the highest frequency.
    pub most_common_location: Option<String>,
    /// Age in whole years at the aggregation reference date.
    pub age: i64,
    /// Balance reported on the most recent transaction.
    pub last_balance: f64,
    pub transaction_count: usize,
}

/// Outcome counters of a cleansing pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanseReport {
    /// Records seen by the pass.
    pub input: usize,
    /// Records dropped for carrying the sentinel birth year.
    pub dropped_sentinel_dob: usize,
    /// Records whose birth year was moved back one century.
    pub shifted_dob: usize,
}

impl CleanseReport {
    /// Number of records that survived cleansing.
    pub fn retained(&self) -> usize {
        self.input - self.dropped_sentinel_dob
    }
}
