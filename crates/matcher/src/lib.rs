//! # custsim Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` turns customer feature sets into a queryable similarity engine.
//! It derives the shingle universe, draws the hash family, signs every
//! customer, bands the signatures into an LSH index and, at query time,
//! re-ranks the LSH candidates with exact Jaccard similarity.
//!
//! Banding only narrows the search; every score a caller sees is the exact
//! Jaccard similarity of two feature sets.
//!
//! ## Core Types
//!
//! - [`Matcher`]: the built engine. [`Matcher::match_customer`] looks up an
//!   indexed customer, [`Matcher::match_query`] a single transaction-shaped
//!   query.
//! - [`MatchConfig`]: `max_results` (0 = unlimited) and `min_score`.
//! - [`MatchHit`]: customer id and score.
//!
//! ## Example Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use features::{Binner, CustomerFeatureSet, FeatureBinners};
//! use index::BandLayout;
//! use matcher::{MatchConfig, Matcher};
//! use minhash::SignatureConfig;
//!
//! let binners = FeatureBinners {
//!     income: Binner::new("income", 0.0, 100.0, 5).unwrap(),
//!     transaction: Binner::new("transaction", 0.0, 100.0, 5).unwrap(),
//!     age: Binner::new("age", 0.0, 100.0, 5).unwrap(),
//! };
//! let sets = vec![
//!     CustomerFeatureSet::new("C1", vec!["1_income".into(), "PUNE".into()]),
//!     CustomerFeatureSet::new("C2", vec!["1_income".into(), "PUNE".into()]),
//!     CustomerFeatureSet::new("C3", vec!["5_income".into(), "DELHI".into()]),
//! ];
//! let matcher = Matcher::build(
//!     &sets,
//!     binners,
//!     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!     &SignatureConfig::new().with_num_hashes(4),
//!     BandLayout::new(4, 1),
//!     MatchConfig::default(),
//! )
//! .unwrap();
//!
//! let hits = matcher.match_customer("C1").unwrap();
//! assert_eq!(hits[0].customer_id, "C2");
//! assert_eq!(hits[0].score, 1.0);
//! ```

pub mod engine;
pub mod similarity;
pub mod types;

pub use crate::engine::{rank_hits, Matcher};
pub use crate::similarity::{jaccard, jaccard_tokens};
pub use crate::types::{MatchConfig, MatchError, MatchHit};
