use std::collections::BTreeSet;

use chrono::NaiveDate;
use custsim::{
    BandLayout, CustomerSignature, HashFamily, HashParam, LshIndex, MatchConfig, PipelineSettings,
    SignatureConfig, SimilarityPipeline, compute_signature, demo, jaccard_tokens,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 12, 31).unwrap()
}

fn demo_pipeline(settings: &PipelineSettings) -> SimilarityPipeline {
    SimilarityPipeline::build(demo::demo_transactions().unwrap(), settings).unwrap()
}

fn unlimited() -> PipelineSettings {
    PipelineSettings::new(as_of()).with_matcher(MatchConfig::new().with_max_results(0))
}

#[test]
fn worked_example_end_to_end() {
    let family =
        HashFamily::from_params(vec![HashParam::new(1, 0), HashParam::new(3, 1)], 5).unwrap();
    let a: BTreeSet<u64> = [0, 2].into_iter().collect();
    let b: BTreeSet<u64> = [0, 3].into_iter().collect();

    let sig_a = compute_signature(&a, &family);
    let sig_b = compute_signature(&b, &family);
    assert_eq!(sig_a, vec![0, 1]);
    assert_eq!(sig_b, vec![0, 0]);

    let index = LshIndex::build(
        BandLayout::new(2, 1),
        &[
            CustomerSignature {
                customer_id: "A".into(),
                values: sig_a,
            },
            CustomerSignature {
                customer_id: "B".into(),
                values: sig_b,
            },
        ],
    )
    .unwrap();
    // Both share the first band key "0".
    assert_eq!(index.candidates_for("A").unwrap(), vec!["B"]);
}

#[test]
fn tied_location_contributes_no_token() {
    let pipeline = demo_pipeline(&unlimited());
    let profile = pipeline
        .profiles()
        .iter()
        .find(|p| p.customer_id == "C1013")
        .unwrap();
    assert_eq!(profile.most_common_location, None);

    let set = pipeline
        .feature_sets()
        .iter()
        .find(|s| s.customer_id == "C1013")
        .unwrap();
    assert_eq!(set.tokens.len(), 3);
}

#[test]
fn every_hit_carries_its_exact_jaccard_score() {
    let pipeline = demo_pipeline(&unlimited());
    let sets = pipeline.feature_sets();

    for set in sets {
        let hits = pipeline.match_customer(&set.customer_id).unwrap();
        for pair in hits.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score
                        && pair[0].customer_id < pair[1].customer_id)
            );
        }
        for hit in &hits {
            assert_ne!(hit.customer_id, set.customer_id);
            let other = sets
                .iter()
                .find(|s| s.customer_id == hit.customer_id)
                .unwrap();
            let expected = jaccard_tokens(&set.tokens, &other.tokens);
            assert!((hit.score - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn candidates_cover_every_customer_sharing_a_band() {
    let pipeline = demo_pipeline(&unlimited());
    let index = pipeline.matcher().index();
    let rows = index.layout().rows_per_band;
    let bands = index.layout().bands;
    let ids: Vec<&str> = pipeline
        .profiles()
        .iter()
        .map(|p| p.customer_id.as_str())
        .collect();

    for a in &ids {
        let candidates = index.candidates_for(a).unwrap();
        let sig_a = index.signature(a).unwrap();
        for b in ids.iter().filter(|b| *b != a) {
            let sig_b = index.signature(b).unwrap();
            let shares_band = sig_a
                .chunks_exact(rows)
                .zip(sig_b.chunks_exact(rows))
                .take(bands)
                .any(|(x, y)| x == y);
            assert_eq!(
                shares_band,
                candidates.iter().any(|c| c == b),
                "{a} vs {b}"
            );
        }
    }
}

#[test]
fn identical_feature_sets_always_find_each_other() {
    let pipeline = demo_pipeline(&unlimited());
    let sets = pipeline.feature_sets();
    for a in sets {
        for b in sets.iter().filter(|b| b.customer_id != a.customer_id) {
            let same: BTreeSet<&str> = a.token_set();
            if same == b.token_set() && !a.is_empty() {
                let hits = pipeline.match_customer(&a.customer_id).unwrap();
                let hit = hits.iter().find(|h| h.customer_id == b.customer_id).unwrap();
                assert_eq!(hit.score, 1.0);
            }
        }
    }
}

#[test]
fn query_with_unknown_location_scores_below_one() {
    let pipeline = demo_pipeline(&unlimited());
    let queries = demo::demo_queries().unwrap();
    let surat = queries.iter().find(|q| q.location == "SURAT").unwrap();

    for hit in pipeline.match_query(surat).unwrap() {
        assert!(hit.score <= 0.75, "{hit:?}");
    }
}

#[test]
fn single_row_bands_keep_scores_in_unit_range() {
    let settings = unlimited()
        .with_signature(SignatureConfig::new().with_num_hashes(12))
        .with_layout(BandLayout::new(12, 1));
    let pipeline = demo_pipeline(&settings);

    for query in demo::demo_queries().unwrap() {
        let hits = pipeline.match_query(&query).unwrap();
        assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.score)));
    }
}

#[test]
fn min_score_filters_and_max_results_truncates() {
    let settings = PipelineSettings::new(as_of())
        .with_matcher(MatchConfig::new().with_max_results(2).with_min_score(0.25));
    let pipeline = demo_pipeline(&settings);
    for profile in pipeline.profiles() {
        let hits = pipeline.match_customer(&profile.customer_id).unwrap();
        assert!(hits.len() <= 2);
        assert!(hits.iter().all(|h| h.score >= 0.25));
    }
}

#[test]
fn parallel_signing_matches_sequential_on_synthetic_data() {
    let records = demo::synthetic_transactions(300, 4, 2024);
    let sequential = PipelineSettings::new(as_of())
        .with_signature(SignatureConfig::new().with_num_hashes(16).with_parallel(false))
        .with_layout(BandLayout::new(8, 2))
        .with_matcher(MatchConfig::new().with_max_results(0));
    let parallel = sequential
        .clone()
        .with_signature(SignatureConfig::new().with_num_hashes(16).with_parallel(true));

    let seq = SimilarityPipeline::build(records.clone(), &sequential).unwrap();
    let par = SimilarityPipeline::build(records, &parallel).unwrap();

    assert_eq!(seq.profiles().len(), 300);
    for profile in seq.profiles().iter().take(50) {
        assert_eq!(
            seq.match_customer(&profile.customer_id).unwrap(),
            par.match_customer(&profile.customer_id).unwrap()
        );
    }
}

#[test]
fn hits_serialize_with_id_and_score() {
    let pipeline = demo_pipeline(&unlimited());
    let hits = pipeline.match_customer("C1001").unwrap();
    let json = serde_json::to_value(&hits).unwrap();
    let array = json.as_array().unwrap();
    assert_eq!(array.len(), hits.len());
    for (value, hit) in array.iter().zip(&hits) {
        assert_eq!(value["customer_id"], hit.customer_id.as_str());
        assert_eq!(value["score"].as_f64().unwrap(), hit.score);
    }
}
