//! HYDRA adversarial engine tests.
//!
//! Tests cover: pattern shape, seeded reproducibility, confidence clamping,
//! and simulation bookkeeping.

use chrono::{NaiveDate, NaiveDateTime};
use trinetra_core::{
    clock::FixedClock,
    hydra::{DetectionRequest, HydraEngine, GENERATION_PATTERNS},
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 9)
        .unwrap()
        .and_hms_opt(14, 7, 2)
        .unwrap()
}

fn engine(seed: u64) -> HydraEngine {
    HydraEngine::with_clock(seed, Box::new(FixedClock::new(now())))
}

fn detection_request(complexity: f64) -> DetectionRequest {
    DetectionRequest {
        pattern_id: "GEN_TEST".into(),
        complexity_score: complexity,
    }
}

#[test]
fn generated_patterns_have_the_expected_shape() {
    let mut hydra = engine(7);
    for _ in 0..25 {
        let p = hydra.generate_pattern();
        assert_eq!(p.pattern_id, "GEN_140702");
        assert_eq!(p.generated_at, now());
        assert!(GENERATION_PATTERNS.contains(&p.pattern_type.as_str()));
        assert!((0.6..0.9).contains(&p.complexity_score), "complexity {}", p.complexity_score);
        assert!((10..=30).contains(&p.transactions.len()), "burst {}", p.transactions.len());

        for (i, t) in p.transactions.iter().enumerate() {
            assert_eq!(t.from_account, format!("GEN_ACC_{:02}", i % 5));
            assert_eq!(t.to_account, format!("TARGET_{:02}", i % 3));
            assert!((1000.0..10000.0).contains(&t.amount), "amount {}", t.amount);
            assert_eq!(t.timestamp, "2025-03-09T14:07:02.000000");
            assert!(t.generated);
        }
    }
}

#[test]
fn same_seed_replays_the_same_simulation() {
    let a = engine(0xDEAD_BEEF).run_simulation(20).unwrap();
    let b = engine(0xDEAD_BEEF).run_simulation(20).unwrap();
    assert_eq!(a, b, "Simulations diverged for the same seed");
}

#[test]
fn confidence_is_clamped() {
    let mut hydra = engine(1);
    for _ in 0..100 {
        let easy = hydra.test_detection(&detection_request(0.5));
        assert!((0.55..0.75).contains(&easy.confidence), "confidence {}", easy.confidence);
        assert!(easy.detected);
        assert_eq!(easy.pattern_id, "GEN_TEST");

        let hard = hydra.test_detection(&detection_request(5.0));
        assert_eq!(hard.confidence, 0.1);
        assert!(!hard.detected);

        let trivial = hydra.test_detection(&detection_request(-5.0));
        assert_eq!(trivial.confidence, 0.95);
        assert!(trivial.detected);
    }
}

#[test]
fn detection_request_defaults_complexity() {
    let req: DetectionRequest = serde_json::from_str(r#"{"pattern_id": "GEN_1"}"#).unwrap();
    assert_eq!(req.complexity_score, 0.5);
    assert!(serde_json::from_str::<DetectionRequest>(r#"{"complexity_score": 0.5}"#).is_err());
}

#[test]
fn simulation_counts_detections() {
    let summary = engine(99).run_simulation(12).unwrap();
    assert_eq!(summary.rounds, 12);
    assert_eq!(summary.results.len(), 12);
    assert_eq!(summary.results[0].round, 1);
    assert_eq!(summary.results[11].round, 12);

    let detected = summary.results.iter().filter(|r| r.detected).count();
    assert_eq!(summary.total_detected, detected);
    assert_eq!(summary.detection_rate, detected as f64 / 12.0);
    for r in &summary.results {
        assert_eq!(r.detected, r.confidence > 0.5);
    }
}

#[test]
fn zero_round_simulation_is_rejected() {
    assert!(engine(3).run_simulation(0).is_err());
}
