//! # custsim Features
//!
//! Turns aggregated customer profiles (and single-transaction queries) into
//! categorical feature sets, and assigns every distinct token a stable
//! integer index for MinHash.
//!
//! ## Pipeline
//!
//! 1.  **Fit**: each binned attribute gets a reference range from a column of
//!     the dataset ([`FeatureBinners::fit`]).
//! 2.  **Bin**: continuous values become ordinal labels such as `"3_income"`
//!     ([`bin_label`]).
//! 3.  **Collect**: labels plus the location form a [`CustomerFeatureSet`].
//! 4.  **Index**: all tokens across all customers form the
//!     [`ShingleUniverse`].
//!
//! ## Example Usage
//!
//! ```
//! use features::{bin_label, CustomerFeatureSet, ShingleUniverse};
//!
//! assert_eq!(bin_label(19.0, 0.0, 100.0, 5, "income").unwrap(), "1_income");
//! assert_eq!(bin_label(100.0, 0.0, 100.0, 5, "income").unwrap(), "5_income");
//!
//! let sets = vec![
//!     CustomerFeatureSet::new("C1", vec!["1_income".into(), "PUNE".into()]),
//!     CustomerFeatureSet::new("C2", vec!["5_income".into(), "PUNE".into()]),
//! ];
//! let universe = ShingleUniverse::build(&sets);
//! assert_eq!(universe.len(), 3);
//! ```
pub mod binner;
pub mod config;
pub mod feature_set;
pub mod universe;

pub use crate::binner::{bin_label, format_label, Binner};
pub use crate::config::{BinningConfig, FeatureError};
pub use crate::feature_set::{
    CustomerFeatureSet, FeatureBinners, QueryRecord, AGE_FEATURE, INCOME_FEATURE,
    TRANSACTION_FEATURE,
};
pub use crate::universe::ShingleUniverse;
