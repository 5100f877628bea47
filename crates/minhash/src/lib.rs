//! # custsim MinHash
//!
//! Seeded hash families and MinHash signatures over shingle-index sets.
//!
//! A [`HashFamily`] is drawn once per universe from an explicit
//! [`rand::rngs::StdRng`]; the same seed always yields the same family.
//! [`SignatureBuilder`] then signs every customer against that family,
//! optionally on the rayon pool.
//!
//! ## Example Usage
//!
//! ```
//! use std::collections::BTreeSet;
//! use minhash::{compute_signature, HashFamily, HashParam};
//!
//! let family = HashFamily::from_params(
//!     vec![HashParam::new(1, 0), HashParam::new(3, 1)],
//!     5,
//! )
//! .unwrap();
//!
//! let a: BTreeSet<u64> = [0, 2].into_iter().collect();
//! let b: BTreeSet<u64> = [0, 3].into_iter().collect();
//! assert_eq!(compute_signature(&a, &family), vec![0, 1]);
//! assert_eq!(compute_signature(&b, &family), vec![0, 0]);
//! ```
pub mod config;
pub mod family;
pub mod signature;

pub use crate::config::{MinHashError, SignatureConfig};
pub use crate::family::{generate_distinct, next_prime, HashFamily, HashParam};
pub use crate::signature::{compute_signature, hash_value, CustomerSignature, SignatureBuilder};
