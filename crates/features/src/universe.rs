//! Shingle universe: stable integer indices for feature tokens.
//!
//! Indices are assigned in first-seen order while the universe is built and
//! never change afterwards. Once built, the universe is read-only; tokens it
//! has never seen map to no index.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::feature_set::CustomerFeatureSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShingleUniverse {
    tokens: Vec<String>,
    positions: HashMap<String, u64>,
}

impl ShingleUniverse {
    /// Index every token of every feature set, in iteration order.
    pub fn build<'a, I>(feature_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a CustomerFeatureSet>,
    {
        let mut universe = Self::default();
        for set in feature_sets {
            for token in &set.tokens {
                universe.insert(token);
            }
        }
        universe
    }

    fn insert(&mut self, token: &str) -> u64 {
        if let Some(&index) = self.positions.get(token) {
            return index;
        }
        let index = self.tokens.len() as u64;
        self.tokens.push(token.to_string());
        self.positions.insert(token.to_string(), index);
        index
    }

    pub fn index_of(&self, token: &str) -> Option<u64> {
        self.positions.get(token).copied()
    }

    pub fn token(&self, index: u64) -> Option<&str> {
        self.tokens.get(index as usize).map(String::as_str)
    }

    /// Shingle indices of `tokens`. Unknown tokens are skipped.
    pub fn indices<S: AsRef<str>>(&self, tokens: &[S]) -> BTreeSet<u64> {
        tokens
            .iter()
            .filter_map(|t| self.index_of(t.as_ref()))
            .collect()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
