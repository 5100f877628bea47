//! MinHash signatures over sets of shingle indices.
//!
//! Entry `h` of a signature is `min over x of (a_h * x + b_h) mod p`. An empty
//! set has no minimum; it signs to all `u64::MAX`, a value no real entry can
//! take because every real entry is below the modulus.

use std::collections::BTreeSet;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::family::HashFamily;

/// `(a*x + b) mod p`, evaluated in 128 bits so it never overflows.
///
/// `p` must be non-zero. Families built through [`HashFamily`] always carry a
/// modulus of at least 2.
#[inline]
pub fn hash_value(a: u64, b: u64, x: u64, p: u64) -> u64 {
    debug_assert!(p > 0, "hash modulus must be non-zero");
    ((a as u128 * x as u128 + b as u128) % p as u128) as u64
}

/// Sign one set of shingle indices. One entry per hash function, in family
/// order.
pub fn compute_signature(indices: &BTreeSet<u64>, family: &HashFamily) -> Vec<u64> {
    if indices.is_empty() {
        return vec![u64::MAX; family.len()];
    }
    let p = family.modulus();
    family
        .params()
        .iter()
        .map(|param| {
            indices
                .iter()
                .map(|&x| hash_value(param.a, param.b, x, p))
                .min()
                .unwrap_or(u64::MAX)
        })
        .collect()
}

/// A customer id with its signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerSignature {
    pub customer_id: String,
    pub values: Vec<u64>,
}

impl CustomerSignature {
    /// True for the sentinel signature of an empty feature set.
    pub fn is_sentinel(&self) -> bool {
        self.values.iter().all(|&v| v == u64::MAX)
    }
}

/// Signs many customers against one hash family.
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    family: HashFamily,
    use_parallel: bool,
}

impl SignatureBuilder {
    pub fn new(family: HashFamily, use_parallel: bool) -> Self {
        Self {
            family,
            use_parallel,
        }
    }

    pub fn family(&self) -> &HashFamily {
        &self.family
    }

    /// Sign a single index set.
    pub fn sign(&self, indices: &BTreeSet<u64>) -> Vec<u64> {
        compute_signature(indices, &self.family)
    }

    /// Sign every `(customer_id, indices)` pair, preserving input order.
    ///
    /// With `use_parallel` the sets are signed on the rayon pool. Each
    /// signature depends only on its own set, so the output is identical
    /// either way.
    pub fn build_all<S>(&self, sets: &[(S, BTreeSet<u64>)]) -> Vec<CustomerSignature>
    where
        S: AsRef<str> + Sync,
    {
        let start = Instant::now();
        let sign_one = |(id, indices): &(S, BTreeSet<u64>)| CustomerSignature {
            customer_id: id.as_ref().to_string(),
            values: compute_signature(indices, &self.family),
        };

        let signatures: Vec<CustomerSignature> = if self.use_parallel {
            sets.par_iter().map(sign_one).collect()
        } else {
            sets.iter().map(sign_one).collect()
        };

        info!(
            customers = signatures.len(),
            num_hashes = self.family.len(),
            parallel = self.use_parallel,
            elapsed_micros = start.elapsed().as_micros() as u64,
            "signatures_built"
        );
        signatures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::HashParam;
    use crate::SignatureConfig;

    fn worked_family() -> HashFamily {
        HashFamily::from_params(vec![HashParam::new(1, 0), HashParam::new(3, 1)], 5).unwrap()
    }

    fn set(values: &[u64]) -> BTreeSet<u64> {
        values.iter().copied().collect()
    }

    #[test]
    fn hash_value_matches_formula() {
        assert_eq!(hash_value(3, 1, 2, 5), 2);
        assert_eq!(hash_value(0, 4, 100, 5), 4);
    }

    #[test]
    fn hash_value_does_not_overflow() {
        let p = 18_446_744_073_709_551_557; // largest u64 prime
        let v = hash_value(u64::MAX - 1, u64::MAX - 1, u64::MAX - 1, p);
        assert!(v < p);
    }

    #[test]
    #[should_panic]
    fn hash_value_rejects_zero_modulus() {
        hash_value(3, 1, 2, 0);
    }

    #[test]
    fn worked_example_signatures() {
        let family = worked_family();
        // x=0: h1=0, h2=1; x=2: h1=2, h2=7%5=2
        assert_eq!(compute_signature(&set(&[0, 2]), &family), vec![0, 1]);
        // x=3: h1=3, h2=10%5=0
        assert_eq!(compute_signature(&set(&[0, 3]), &family), vec![0, 0]);
    }

    #[test]
    fn empty_set_signs_to_sentinel() {
        let family = worked_family();
        assert_eq!(
            compute_signature(&BTreeSet::new(), &family),
            vec![u64::MAX, u64::MAX]
        );
    }

    #[test]
    fn identical_sets_identical_signatures() {
        let family = HashFamily::from_config(&SignatureConfig::default(), 40).unwrap();
        let a = compute_signature(&set(&[1, 5, 9, 30]), &family);
        let b = compute_signature(&set(&[30, 9, 5, 1]), &family);
        assert_eq!(a, b);
        assert_eq!(a.len(), family.len());
    }

    #[test]
    fn entries_are_below_modulus() {
        let family = HashFamily::from_config(&SignatureConfig::default(), 40).unwrap();
        let sig = compute_signature(&set(&[0, 7, 39]), &family);
        assert!(sig.iter().all(|&v| v < family.modulus()));
    }

    #[test]
    fn build_all_preserves_order_and_marks_sentinels() {
        let builder = SignatureBuilder::new(worked_family(), false);
        let sets = vec![
            ("C1", set(&[0, 2])),
            ("C2", BTreeSet::new()),
            ("C3", set(&[0, 3])),
        ];
        let signatures = builder.build_all(&sets);
        let ids: Vec<_> = signatures.iter().map(|s| s.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3"]);
        assert_eq!(signatures[0].values, vec![0, 1]);
        assert!(signatures[1].is_sentinel());
        assert!(!signatures[2].is_sentinel());
    }

    #[test]
    fn parallel_equals_sequential() {
        let cfg = SignatureConfig::new().with_num_hashes(32);
        let family = HashFamily::from_config(&cfg, 200).unwrap();
        let sets: Vec<(String, BTreeSet<u64>)> = (0..64u64)
            .map(|i| (format!("C{i}"), set(&[i, i * 2 % 200, (i * 7 + 3) % 200])))
            .collect();

        let seq = SignatureBuilder::new(family.clone(), false).build_all(&sets);
        let par = SignatureBuilder::new(family, true).build_all(&sets);
        assert_eq!(seq, par);
    }
}
