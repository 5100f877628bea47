//! Workspace umbrella crate for customer similarity discovery (custsim).
//!
//! This crate stitches the stages together so callers can go from raw
//! transaction records to ranked similar customers through a single API:
//!
//! 1. `ingest`: cleanse birth dates and aggregate transactions per customer.
//! 2. `features`: bin balances, amounts and ages into categorical tokens.
//! 3. `minhash` + `index`: sign feature sets and band them into LSH buckets.
//! 4. `matcher`: re-rank LSH candidates by exact Jaccard similarity.
//!
//! ```
//! use custsim::{demo, PipelineSettings, SimilarityPipeline};
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2016, 12, 31).unwrap();
//! let records = demo::demo_transactions().unwrap();
//! let pipeline = SimilarityPipeline::build(records, &PipelineSettings::new(as_of)).unwrap();
//!
//! for hit in pipeline.match_customer("C1001").unwrap() {
//!     assert!((0.0..=1.0).contains(&hit.score));
//! }
//! ```

pub mod config;
pub mod demo;

pub use config::{ConfigLoadError, CustsimConfig};
pub use features::{
    Binner, BinningConfig, CustomerFeatureSet, FeatureBinners, FeatureError, QueryRecord,
    ShingleUniverse, bin_label,
};
pub use index::{BandLayout, BandStats, IndexError, LshIndex};
pub use ingest::{
    CleanseConfig, CleanseReport, CustomerProfile, IngestBatch, IngestError, TransactionRecord,
    aggregate, age_at, cleanse, ingest_transactions, most_common_location, parse_record_date,
};
pub use matcher::{MatchConfig, MatchError, MatchHit, Matcher, jaccard, jaccard_tokens};
pub use minhash::{
    CustomerSignature, HashFamily, HashParam, MinHashError, SignatureBuilder, SignatureConfig,
    compute_signature, generate_distinct, hash_value,
};

use chrono::NaiveDate;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Errors that can occur while building or querying the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Ingest(IngestError),
    Features(FeatureError),
    Match(MatchError),
    /// Cleansing left no transactions to derive reference ranges from.
    EmptyDataset,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Features(err) => write!(f, "feature extraction failure: {err}"),
            PipelineError::Match(err) => write!(f, "matching failure: {err}"),
            PipelineError::EmptyDataset => write!(f, "no transactions left after cleansing"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Features(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::EmptyDataset => None,
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<FeatureError> for PipelineError {
    fn from(value: FeatureError) -> Self {
        PipelineError::Features(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

impl From<MinHashError> for PipelineError {
    fn from(value: MinHashError) -> Self {
        PipelineError::Match(MatchError::MinHash(value))
    }
}

impl From<IndexError> for PipelineError {
    fn from(value: IndexError) -> Self {
        PipelineError::Match(MatchError::Index(value))
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_ingest(&self, latency: Duration, result: Result<(), IngestError>);
    fn record_features(&self, latency: Duration, result: Result<(), FeatureError>);
    fn record_index(&self, latency: Duration, result: Result<(), MatchError>);
    fn record_match(&self, latency: Duration, result: Result<usize, MatchError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_ingest<T>(self, result: &Result<T, IngestError>) {
        self.recorder
            .record_ingest(self.start.elapsed(), unit(result));
    }

    fn record_features<T>(self, result: &Result<T, FeatureError>) {
        self.recorder
            .record_features(self.start.elapsed(), unit(result));
    }

    fn record_index<T>(self, result: &Result<T, MatchError>) {
        self.recorder.record_index(self.start.elapsed(), unit(result));
    }

    fn record_match(self, result: &Result<Vec<MatchHit>, MatchError>) {
        let outcome = result.as_ref().map(Vec::len).map_err(Clone::clone);
        self.recorder.record_match(self.start.elapsed(), outcome);
    }
}

fn unit<T, E: Clone>(result: &Result<T, E>) -> Result<(), E> {
    result.as_ref().map(|_| ()).map_err(Clone::clone)
}

/// Per-stage settings for [`SimilarityPipeline::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub cleanse: CleanseConfig,
    pub binning: BinningConfig,
    pub signature: SignatureConfig,
    pub layout: BandLayout,
    pub matcher: MatchConfig,
    /// Reference date for customer and query ages.
    pub as_of: NaiveDate,
}

impl PipelineSettings {
    /// Stage defaults with ages measured at `as_of`.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            cleanse: CleanseConfig::default(),
            binning: BinningConfig::default(),
            signature: SignatureConfig::default(),
            layout: BandLayout::default(),
            matcher: MatchConfig::default(),
            as_of,
        }
    }

    pub fn with_signature(mut self, signature: SignatureConfig) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_layout(mut self, layout: BandLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_matcher(mut self, matcher: MatchConfig) -> Self {
        self.matcher = matcher;
        self
    }
}

/// A fully built similarity index over one batch of transactions.
///
/// Built in a single pass and read-only afterwards; new data means building a
/// new pipeline.
#[derive(Debug, Clone)]
pub struct SimilarityPipeline {
    report: CleanseReport,
    profiles: Vec<CustomerProfile>,
    feature_sets: Vec<CustomerFeatureSet>,
    matcher: Matcher,
}

impl SimilarityPipeline {
    /// Cleanse, aggregate, featurize, sign and index `records`.
    pub fn build(
        records: Vec<TransactionRecord>,
        settings: &PipelineSettings,
    ) -> Result<Self, PipelineError> {
        let start = Instant::now();
        let span = tracing::info_span!("pipeline.build", as_of = %settings.as_of);
        let _guard = span.enter();

        let result = Self::build_stages(records, settings);
        let elapsed_micros = start.elapsed().as_micros() as u64;
        match &result {
            Ok(pipeline) => info!(
                customers = pipeline.profiles.len(),
                retained = pipeline.report.retained(),
                elapsed_micros,
                "pipeline_built"
            ),
            Err(err) => warn!(error = %err, elapsed_micros, "pipeline_build_failed"),
        }
        result
    }

    fn build_stages(
        records: Vec<TransactionRecord>,
        settings: &PipelineSettings,
    ) -> Result<Self, PipelineError> {
        let metrics = MetricsSpan::start();
        let batch = ingest_transactions(records, &settings.cleanse, settings.as_of);
        if let Some(span) = metrics {
            span.record_ingest(&batch);
        }
        let batch = batch?;
        if batch.transactions.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let metrics = MetricsSpan::start();
        let features = FeatureBinners::fit(&batch.transactions, &batch.profiles, &settings.binning)
            .and_then(|binners| {
                let sets = binners.profile_feature_sets(&batch.profiles)?;
                Ok((binners, sets))
            });
        if let Some(span) = metrics {
            span.record_features(&features);
        }
        let (binners, feature_sets) = features?;

        let metrics = MetricsSpan::start();
        let matcher = Matcher::build(
            &feature_sets,
            binners,
            settings.as_of,
            &settings.signature,
            settings.layout,
            settings.matcher.clone(),
        );
        if let Some(span) = metrics {
            span.record_index(&matcher);
        }

        Ok(Self {
            report: batch.report,
            profiles: batch.profiles,
            feature_sets,
            matcher: matcher?,
        })
    }

    /// Customers most similar to an indexed customer.
    pub fn match_customer(&self, customer_id: &str) -> Result<Vec<MatchHit>, PipelineError> {
        let metrics = MetricsSpan::start();
        let result = self.matcher.match_customer(customer_id);
        if let Some(span) = metrics {
            span.record_match(&result);
        }
        Ok(result?)
    }

    /// Customers most similar to a single query record.
    pub fn match_query(&self, query: &QueryRecord) -> Result<Vec<MatchHit>, PipelineError> {
        let metrics = MetricsSpan::start();
        let result = self.matcher.match_query(query);
        if let Some(span) = metrics {
            span.record_match(&result);
        }
        Ok(result?)
    }

    pub fn report(&self) -> &CleanseReport {
        &self.report
    }

    pub fn profiles(&self) -> &[CustomerProfile] {
        &self.profiles
    }

    pub fn feature_sets(&self) -> &[CustomerFeatureSet] {
        &self.feature_sets
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 12, 31).unwrap()
    }

    #[derive(Default)]
    struct RecordingMetrics {
        events: Mutex<Vec<String>>,
    }

    impl PipelineMetrics for RecordingMetrics {
        fn record_ingest(&self, _latency: Duration, result: Result<(), IngestError>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("ingest:{}", result.is_ok()));
        }

        fn record_features(&self, _latency: Duration, result: Result<(), FeatureError>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("features:{}", result.is_ok()));
        }

        fn record_index(&self, _latency: Duration, result: Result<(), MatchError>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("index:{}", result.is_ok()));
        }

        fn record_match(&self, _latency: Duration, result: Result<usize, MatchError>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("match:{}", result.is_ok()));
        }
    }

    #[test]
    fn pipeline_builds_over_demo_data() {
        let records = demo::demo_transactions().unwrap();
        let pipeline = SimilarityPipeline::build(records, &PipelineSettings::new(as_of())).unwrap();

        assert_eq!(pipeline.report().dropped_sentinel_dob, 1);
        assert_eq!(pipeline.report().shifted_dob, 1);
        assert_eq!(pipeline.profiles().len(), pipeline.feature_sets().len());
        assert_eq!(pipeline.matcher().len(), pipeline.profiles().len());
        assert!(pipeline.profiles().iter().all(|p| p.customer_id != "C1006"));
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = SimilarityPipeline::build(Vec::new(), &PipelineSettings::new(as_of()));
        assert_eq!(result.unwrap_err(), PipelineError::EmptyDataset);
    }

    #[test]
    fn stage_errors_convert() {
        let err: PipelineError = IndexError::UnknownCustomer("C1".into()).into();
        assert!(matches!(err, PipelineError::Match(MatchError::Index(_))));
        assert!(err.to_string().contains("matching failure"));
        assert!(err.source().is_some());
    }

    #[test]
    fn metrics_observer_sees_every_stage() {
        let recorder = Arc::new(RecordingMetrics::default());
        set_pipeline_metrics(Some(recorder.clone()));

        let records = demo::demo_transactions().unwrap();
        let pipeline = SimilarityPipeline::build(records, &PipelineSettings::new(as_of())).unwrap();
        let _ = pipeline.match_customer("C1001").unwrap();
        let _ = pipeline.match_customer("missing");

        set_pipeline_metrics(None);

        let events = recorder.events.lock().unwrap().clone();
        for expected in [
            "ingest:true",
            "features:true",
            "index:true",
            "match:true",
            "match:false",
        ] {
            assert!(
                events.iter().any(|e| e == expected),
                "missing {expected} in {events:?}"
            );
        }
    }
}
