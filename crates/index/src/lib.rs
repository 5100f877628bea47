//! # custsim Index
//!
//! Locality-sensitive bucketing of MinHash signatures.
//!
//! A [`BandLayout`] cuts each signature into `bands` slices of
//! `rows_per_band` entries. Each band has its own bucket table keyed by the
//! slice's values. Customers that agree on a whole band share a bucket and
//! become candidates for each other; exact scoring happens downstream.
//!
//! The index is built in one pass and is read-only afterwards. Any change to
//! the customer set means building a new one.
//!
//! ## Example Usage
//!
//! ```
//! use index::{BandLayout, LshIndex};
//! use minhash::CustomerSignature;
//!
//! let signatures = vec![
//!     CustomerSignature { customer_id: "C1".into(), values: vec![1, 2, 3, 4] },
//!     CustomerSignature { customer_id: "C2".into(), values: vec![1, 2, 0, 0] },
//!     CustomerSignature { customer_id: "C3".into(), values: vec![9, 9, 9, 9] },
//! ];
//! let index = LshIndex::build(BandLayout::new(2, 2), &signatures).unwrap();
//!
//! assert_eq!(index.candidates_for("C1").unwrap(), vec!["C2"]);
//! ```
mod banding;
mod config;
mod lsh;

pub use crate::banding::{band_key, band_keys};
pub use crate::config::{BandLayout, IndexError};
pub use crate::lsh::{BandStats, LshIndex};
