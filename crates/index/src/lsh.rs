//! Banded bucket tables and candidate lookup.
//!
//! Two customers land in the same bucket of band `i` exactly when their
//! signatures agree on every entry of band `i`. A candidate set is the union
//! over all bands, so it can contain false positives but never misses a
//! customer whose signature agrees on some full band.
//!
//! Customers with empty feature sets carry the all-`u64::MAX` signature and
//! therefore share buckets with each other only.

use std::collections::BTreeSet;
use std::time::Instant;

use hashbrown::HashMap;
use minhash::CustomerSignature;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::banding::band_keys;
use crate::config::{BandLayout, IndexError};

/// Bucket counts for one band table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandStats {
    pub band: usize,
    pub buckets: usize,
    pub largest_bucket: usize,
}

/// Read-only LSH index. Rebuild it to change anything.
#[derive(Debug, Clone)]
pub struct LshIndex {
    layout: BandLayout,
    signature_len: usize,
    tables: Vec<HashMap<String, Vec<String>>>,
    signatures: HashMap<String, Vec<u64>>,
}

impl LshIndex {
    /// Index every signature in every band table.
    ///
    /// All signatures must share one length, which the layout must fit. An
    /// empty input yields an empty index sized for exactly the layout's rows.
    pub fn build(layout: BandLayout, signatures: &[CustomerSignature]) -> Result<Self, IndexError> {
        let start = Instant::now();
        let signature_len = signatures
            .first()
            .map_or(layout.covered_rows(), |s| s.values.len());
        layout.validate(signature_len)?;

        let unused = layout.unused_rows(signature_len);
        if unused > 0 {
            debug!(
                signature_len,
                bands = layout.bands,
                rows_per_band = layout.rows_per_band,
                unused_rows = unused,
                "band_remainder_ignored"
            );
        }

        let mut index = Self {
            layout,
            signature_len,
            tables: (0..layout.bands).map(|_| HashMap::new()).collect(),
            signatures: HashMap::with_capacity(signatures.len()),
        };
        for signature in signatures {
            index.insert(signature)?;
        }

        info!(
            customers = index.signatures.len(),
            bands = layout.bands,
            rows_per_band = layout.rows_per_band,
            buckets = index.tables.iter().map(HashMap::len).sum::<usize>(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "lsh_index_built"
        );
        Ok(index)
    }

    fn insert(&mut self, signature: &CustomerSignature) -> Result<(), IndexError> {
        self.check_len(&signature.values)?;
        if self.signatures.contains_key(&signature.customer_id) {
            return Err(IndexError::DuplicateCustomer(signature.customer_id.clone()));
        }
        for (table, key) in self
            .tables
            .iter_mut()
            .zip(band_keys(&signature.values, &self.layout))
        {
            table
                .entry(key)
                .or_default()
                .push(signature.customer_id.clone());
        }
        self.signatures
            .insert(signature.customer_id.clone(), signature.values.clone());
        Ok(())
    }

    fn check_len(&self, values: &[u64]) -> Result<(), IndexError> {
        if values.len() != self.signature_len {
            return Err(IndexError::SignatureLength {
                expected: self.signature_len,
                got: values.len(),
            });
        }
        Ok(())
    }

    /// Customers sharing at least one band bucket with `signature`, sorted by
    /// id and deduplicated. `exclude` is removed from the result.
    pub fn candidates(
        &self,
        signature: &[u64],
        exclude: Option<&str>,
    ) -> Result<Vec<String>, IndexError> {
        self.check_len(signature)?;
        let mut found: BTreeSet<&str> = BTreeSet::new();
        for (table, key) in self.tables.iter().zip(band_keys(signature, &self.layout)) {
            if let Some(ids) = table.get(&key) {
                found.extend(ids.iter().map(String::as_str));
            }
        }
        if let Some(exclude) = exclude {
            found.remove(exclude);
        }
        Ok(found.into_iter().map(str::to_string).collect())
    }

    /// Candidates of an indexed customer, excluding the customer itself.
    pub fn candidates_for(&self, customer_id: &str) -> Result<Vec<String>, IndexError> {
        let signature = self
            .signature(customer_id)
            .ok_or_else(|| IndexError::UnknownCustomer(customer_id.to_string()))?;
        self.candidates(signature, Some(customer_id))
    }

    /// Stored signature of an indexed customer.
    pub fn signature(&self, customer_id: &str) -> Option<&[u64]> {
        self.signatures.get(customer_id).map(Vec::as_slice)
    }

    pub fn contains(&self, customer_id: &str) -> bool {
        self.signatures.contains_key(customer_id)
    }

    pub fn bucket_stats(&self) -> Vec<BandStats> {
        self.tables
            .iter()
            .enumerate()
            .map(|(band, table)| BandStats {
                band,
                buckets: table.len(),
                largest_bucket: table.values().map(Vec::len).max().unwrap_or(0),
            })
            .collect()
    }

    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    pub fn signature_len(&self) -> usize {
        self.signature_len
    }

    /// Number of indexed customers.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
