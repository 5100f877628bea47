use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::time::Instant;

use chrono::NaiveDate;
use features::{CustomerFeatureSet, FeatureBinners, QueryRecord, ShingleUniverse};
use hashbrown::{HashMap, HashSet};
use index::{BandLayout, LshIndex};
use minhash::{HashFamily, SignatureBuilder, SignatureConfig};
use tracing::{debug, info};

use crate::similarity::jaccard;
use crate::types::{MatchConfig, MatchError, MatchHit};


/// Similarity engine over a fixed set of customers.
///
/// Owns everything derived from the customer feature sets: the shingle
/// universe, the hash family, the LSH index and the token sets used for exact
/// scoring. All of it is built once by [`Matcher::build`] and never mutated,
/// so a `Matcher` can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    binners: FeatureBinners,
    universe: ShingleUniverse,
    signer: SignatureBuilder,
    index: LshIndex,
    token_sets: HashMap<String, HashSet<String>>,
    as_of: NaiveDate,
    cfg: MatchConfig,
}

impl Matcher {
    /// Index `feature_sets` and prepare for lookups.
    ///
    /// `binners` and `as_of` are kept to derive feature sets for ad-hoc
    /// queries the same way the customers' were derived.
    pub fn build(
        feature_sets: &[CustomerFeatureSet],
        binners: FeatureBinners,
        as_of: NaiveDate,
        signature_cfg: &SignatureConfig,
        layout: BandLayout,
        cfg: MatchConfig,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        let start = Instant::now();

        let universe = ShingleUniverse::build(feature_sets);
        let family = HashFamily::from_config(signature_cfg, universe.len() as u64)?;
        let signer = SignatureBuilder::new(family, signature_cfg.use_parallel);

        let indexed: Vec<(&str, BTreeSet<u64>)> = feature_sets
            .iter()
            .map(|set| (set.customer_id.as_str(), universe.indices(&set.tokens)))
            .collect();
        let signatures = signer.build_all(&indexed);
        let index = LshIndex::build(layout, &signatures)?;

        let token_sets = feature_sets
            .iter()
            .map(|set| {
                (
                    set.customer_id.clone(),
                    set.tokens.iter().cloned().collect::<HashSet<_>>(),
                )
            })
            .collect();

        info!(
            customers = feature_sets.len(),
            universe_size = universe.len(),
            num_hashes = signer.family().len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "matcher_built"
        );

        Ok(Self {
            binners,
            universe,
            signer,
            index,
            token_sets,
            as_of,
            cfg,
        })
    }

    /// Customers most similar to an indexed customer, excluding itself.
    pub fn match_customer(&self, customer_id: &str) -> Result<Vec<MatchHit>, MatchError> {
        let start = Instant::now();
        let candidates = self.index.candidates_for(customer_id)?;
        let own = self
            .token_sets
            .get(customer_id)
            .ok_or_else(|| index::IndexError::UnknownCustomer(customer_id.to_string()))?;
        let hits = self.score(own, &candidates);
        debug!(
            customer_id,
            candidates = candidates.len(),
            hits = hits.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "match_customer"
        );
        Ok(hits)
    }

    /// Customers most similar to a single transaction-shaped query.
    ///
    /// A customer whose id equals `query.query_id` is left out of the
    /// candidates, so a query built from one of a customer's own transactions
    /// never returns that customer. Tokens the universe has never seen still
    /// count towards the union when scoring, but cannot produce candidates.
    pub fn match_query(&self, query: &QueryRecord) -> Result<Vec<MatchHit>, MatchError> {
        let start = Instant::now();
        let features = self.binners.query_features(query, self.as_of)?;
        let indices = self.universe.indices(&features.tokens);
        let signature = self.signer.sign(&indices);
        let candidates = self
            .index
            .candidates(&signature, Some(query.query_id.as_str()))?;

        let own: HashSet<String> = features.tokens.into_iter().collect();
        let hits = self.score(&own, &candidates);
        debug!(
            query_id = %query.query_id,
            candidates = candidates.len(),
            hits = hits.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "match_query"
        );
        Ok(hits)
    }

    fn score(&self, own: &HashSet<String>, candidates: &[String]) -> Vec<MatchHit> {
        let hits = candidates
            .iter()
            .filter_map(|id| {
                self.token_sets.get(id).map(|tokens| MatchHit {
                    customer_id: id.clone(),
                    score: jaccard(own, tokens),
                })
            })
            .collect();
        rank_hits(hits, &self.cfg)
    }

    pub fn index(&self) -> &LshIndex {
        &self.index
    }

    pub fn universe(&self) -> &ShingleUniverse {
        &self.universe
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Number of indexed customers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Order hits by score descending, ties by customer id ascending, then apply
/// `min_score` and `max_results`.
pub fn rank_hits(mut hits: Vec<MatchHit>, cfg: &MatchConfig) -> Vec<MatchHit> {
    hits.retain(|hit| hit.score >= cfg.min_score);
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    if cfg.max_results > 0 {
        hits.truncate(cfg.max_results);
    }
    hits
}
