//! Categorical feature sets for customers and queries.
//!
//! A feature set holds, in this order: the income class, the transaction
//! class, the age class and the location. A customer without a majority
//! location simply has one token fewer.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use ingest::{age_at, CustomerProfile, TransactionRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::binner::Binner;
use crate::config::{BinningConfig, FeatureError};

pub const INCOME_FEATURE: &str = "income";
pub const TRANSACTION_FEATURE: &str = "transaction";
pub const AGE_FEATURE: &str = "age";

/// Ordered categorical tokens describing one customer (or one query).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerFeatureSet {
    pub customer_id: String,
    pub tokens: Vec<String>,
}

impl CustomerFeatureSet {
    pub fn new(customer_id: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            tokens,
        }
    }

    /// Distinct tokens as a set, for set-similarity scoring.
    pub fn token_set(&self) -> BTreeSet<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A single transaction-shaped lookup against the customer index.
///
/// Unlike a [`CustomerProfile`], a query carries one raw location and one
/// amount rather than aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRecord {
    pub query_id: String,
    pub location: String,
    pub account_balance: f64,
    pub amount: f64,
    pub customer_dob: NaiveDate,
}

impl From<&TransactionRecord> for QueryRecord {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            query_id: record.customer_id.clone(),
            location: record.location.clone(),
            account_balance: record.account_balance,
            amount: record.amount,
            customer_dob: record.customer_dob,
        }
    }
}

/// The three fitted binners used to derive categorical tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureBinners {
    pub income: Binner,
    pub transaction: Binner,
    pub age: Binner,
}

impl FeatureBinners {
    /// Fit reference ranges.
    ///
    /// Income and transaction ranges come from the transaction-level balance
    /// and amount columns; the age range comes from the aggregated profiles.
    pub fn fit(
        transactions: &[TransactionRecord],
        profiles: &[CustomerProfile],
        cfg: &BinningConfig,
    ) -> Result<Self, FeatureError> {
        cfg.validate()?;
        let binners = Self {
            income: Binner::from_reference(
                INCOME_FEATURE,
                transactions.iter().map(|t| t.account_balance),
                cfg.income_bins,
            )?,
            transaction: Binner::from_reference(
                TRANSACTION_FEATURE,
                transactions.iter().map(|t| t.amount),
                cfg.transaction_bins,
            )?,
            age: Binner::from_reference(
                AGE_FEATURE,
                profiles.iter().map(|p| p.age as f64),
                cfg.age_bins,
            )?,
        };
        for binner in [&binners.income, &binners.transaction, &binners.age] {
            debug!(
                feature = %binner.name,
                lower = binner.lower,
                upper = binner.upper,
                bins = binner.bins,
                "binner_fitted"
            );
        }
        Ok(binners)
    }

    /// Feature set of an aggregated customer profile.
    pub fn profile_features(
        &self,
        profile: &CustomerProfile,
    ) -> Result<CustomerFeatureSet, FeatureError> {
        let mut tokens = vec![
            self.income.label(profile.last_balance)?,
            self.transaction.label(profile.average_amount)?,
            self.age.label(profile.age as f64)?,
        ];
        if let Some(location) = &profile.most_common_location {
            tokens.push(location.clone());
        }
        Ok(CustomerFeatureSet::new(profile.customer_id.clone(), tokens))
    }

    /// Feature sets of every profile, in input order.
    pub fn profile_feature_sets(
        &self,
        profiles: &[CustomerProfile],
    ) -> Result<Vec<CustomerFeatureSet>, FeatureError> {
        profiles.iter().map(|p| self.profile_features(p)).collect()
    }

    /// Feature set of a query. Age is measured at `as_of`.
    pub fn query_features(
        &self,
        query: &QueryRecord,
        as_of: NaiveDate,
    ) -> Result<CustomerFeatureSet, FeatureError> {
        let tokens = vec![
            self.income.label(query.account_balance)?,
            self.transaction.label(query.amount)?,
            self.age.label(age_at(query.customer_dob, as_of) as f64)?,
            query.location.clone(),
        ];
        Ok(CustomerFeatureSet::new(query.query_id.clone(), tokens))
    }
}
