//! Same seed, same dataset. Seeding is idempotent.

use chrono::{NaiveDate, NaiveDateTime};
use trinetra_core::{
    store::TransactionStore,
    synthetic::{init_database, SyntheticGenerator, BASELINE_SIZE, SUSPICIOUS_SCENARIO_SIZE},
    types::{CRYPTO_SANCTIONS, TERRORIST_FINANCING},
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

#[test]
fn same_seed_produces_identical_datasets() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let a = SyntheticGenerator::new(SEED, now()).generate_all();
    let b = SyntheticGenerator::new(SEED, now()).generate_all();

    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert_eq!(x, y, "Datasets diverged at row {i}");
    }
}

#[test]
fn different_seeds_differ() {
    let a = SyntheticGenerator::new(1, now()).generate_scenario(CRYPTO_SANCTIONS, 20);
    let b = SyntheticGenerator::new(2, now()).generate_scenario(CRYPTO_SANCTIONS, 20);
    assert_ne!(a, b);
}

#[test]
fn storylines_follow_their_shape() {
    let txns = SyntheticGenerator::new(7, now()).generate_scenario(TERRORIST_FINANCING, 30);
    assert_eq!(txns[0].transaction_id.as_deref(), Some("TF_0000"));
    assert_eq!(txns[0].to_account.as_deref(), Some("TERROR_CELL_001"));
    assert_eq!(txns[0].timestamp.as_deref(), Some("2024-12-16T08:00:00.000000"));
    assert_eq!(txns[1].timestamp.as_deref(), Some("2024-12-16T09:00:00.000000"));
    for t in &txns {
        let amount = t.amount_strict().unwrap();
        let score = t.score_strict().unwrap();
        assert!((50.0..500.0).contains(&amount), "amount {amount} out of range");
        assert!((0.6..0.9).contains(&score), "score {score} out of range");
        assert_eq!(t.pattern_type.as_deref(), Some("micro_donations"));
    }
}

#[test]
fn init_database_seeds_once() {
    let store = TransactionStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let generator = SyntheticGenerator::new(42, now());

    let first = init_database(&store, &generator).unwrap();
    assert_eq!(first, 3 * SUSPICIOUS_SCENARIO_SIZE + BASELINE_SIZE);

    let second = init_database(&store, &generator).unwrap();
    assert_eq!(second, 0, "Second init must not insert");
    assert_eq!(store.transaction_count().unwrap(), first as i64);
}
