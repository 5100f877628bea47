//! Seeded generation of the universal hash family `h(x) = (a*x + b) mod p`.
//!
//! Multipliers and offsets are each drawn without replacement from
//! `[0, universe_size]` by resampling until an unseen value comes up. Both
//! lists are drawn from the same generator, multipliers first, so the family
//! is a pure function of `(k, universe_size, seed)`.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{MinHashError, SignatureConfig};

/// Draw `k` distinct integers from `[0, max]`.
///
/// Fails instead of looping forever (or returning fewer values) when the
/// range holds fewer than `k` integers.
pub fn generate_distinct(k: usize, max: u64, rng: &mut StdRng) -> Result<Vec<u64>, MinHashError> {
    if k as u128 > max as u128 + 1 {
        return Err(MinHashError::InvalidConfiguration(format!(
            "cannot draw {k} distinct values from [0, {max}]"
        )));
    }
    let mut seen = HashSet::with_capacity(k);
    let mut values = Vec::with_capacity(k);
    while values.len() < k {
        let candidate = rng.random_range(0..=max);
        if seen.insert(candidate) {
            values.push(candidate);
        }
    }
    Ok(values)
}

/// Smallest prime strictly greater than `n`, or `None` if it does not fit in
/// a `u64`.
pub fn next_prime(n: u64) -> Option<u64> {
    let mut candidate = n.checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// One `(a, b)` pair of the family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashParam {
    pub a: u64,
    pub b: u64,
}

impl HashParam {
    pub fn new(a: u64, b: u64) -> Self {
        Self { a, b }
    }
}

/// An ordered list of hash parameters sharing one modulus.
///
/// The order of `params` fixes the order of signature entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashFamily {
    params: Vec<HashParam>,
    modulus: u64,
}

impl HashFamily {
    /// Draw `k` hash functions for a universe of `universe_size` tokens.
    ///
    /// The modulus is the smallest prime above `universe_size`.
    pub fn generate(k: usize, universe_size: u64, rng: &mut StdRng) -> Result<Self, MinHashError> {
        let modulus = next_prime(universe_size).ok_or_else(|| {
            MinHashError::InvalidConfiguration(format!(
                "no u64 prime above universe size {universe_size}"
            ))
        })?;
        Self::with_modulus(k, universe_size, modulus, rng)
    }

    /// Draw `k` hash functions with an explicit modulus.
    ///
    /// The modulus must exceed every token index, i.e. be at least
    /// `universe_size`, and must be at least 2.
    pub fn with_modulus(
        k: usize,
        universe_size: u64,
        modulus: u64,
        rng: &mut StdRng,
    ) -> Result<Self, MinHashError> {
        if k == 0 {
            return Err(MinHashError::InvalidConfiguration(
                "hash family needs at least one function".into(),
            ));
        }
        if modulus < 2 || modulus < universe_size {
            return Err(MinHashError::InvalidConfiguration(format!(
                "modulus {modulus} does not exceed the largest index of a universe of {universe_size}"
            )));
        }
        let a = generate_distinct(k, universe_size, rng)?;
        let b = generate_distinct(k, universe_size, rng)?;
        let params = a
            .into_iter()
            .zip(b)
            .map(|(a, b)| HashParam::new(a, b))
            .collect();
        debug!(num_hashes = k, universe_size, modulus, "hash_family_generated");
        Ok(Self { params, modulus })
    }

    /// Build the family described by `cfg` for a universe of `universe_size`
    /// tokens, seeding a fresh generator from `cfg.seed`.
    pub fn from_config(cfg: &SignatureConfig, universe_size: u64) -> Result<Self, MinHashError> {
        cfg.validate()?;
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        match cfg.modulus {
            Some(modulus) => Self::with_modulus(cfg.num_hashes, universe_size, modulus, &mut rng),
            None => Self::generate(cfg.num_hashes, universe_size, &mut rng),
        }
    }

    /// Use a fixed parameter list.
    pub fn from_params(params: Vec<HashParam>, modulus: u64) -> Result<Self, MinHashError> {
        if params.is_empty() {
            return Err(MinHashError::InvalidConfiguration(
                "hash family needs at least one function".into(),
            ));
        }
        if modulus < 2 {
            return Err(MinHashError::InvalidConfiguration(format!(
                "modulus must be >= 2 (got {modulus})"
            )));
        }
        Ok(Self { params, modulus })
    }

    pub fn params(&self) -> &[HashParam] {
        &self.params
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of hash functions, i.e. the signature length.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
