//! Timeline projection tests, run against a real in-memory store.

use trinetra_core::{
    error::MonitorError,
    store::TransactionStore,
    timeline::{project_timeline, ScenarioFilter},
    transaction::{FieldValue, TransactionRecord},
};

fn store() -> TransactionStore {
    let store = TransactionStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn record(id: &str, ts: &str, scenario: &str) -> TransactionRecord {
    TransactionRecord {
        transaction_id: Some(id.into()),
        timestamp: Some(ts.into()),
        from_account: Some("ACC_A".into()),
        to_account: Some("ACC_B".into()),
        amount: Some(FieldValue::Real(250.0)),
        suspicious_score: Some(FieldValue::Real(0.4)),
        pattern_type: Some("normal".into()),
        scenario: Some(scenario.into()),
        ..Default::default()
    }
}

fn seeded() -> TransactionStore {
    let s = store();
    s.insert_transactions(&[
        record("T3", "2024-01-03T00:00:00", "crypto_sanctions"),
        record("T1", "2024-01-01T00:00:00", "terrorist_financing"),
        record("T2", "2024-01-02T00:00:00", "crypto_sanctions"),
    ])
    .expect("insert");
    s
}

fn timeline(store: &TransactionStore, filter: ScenarioFilter) -> Result<Vec<String>, MonitorError> {
    let records = store.timeline_transactions(&filter)?;
    let entries = project_timeline(&filter, &records)?;
    Ok(entries.into_iter().filter_map(|e| e.id).collect())
}

#[test]
fn all_returns_everything_in_time_order() {
    let ids = timeline(&seeded(), ScenarioFilter::parse("all")).unwrap();
    assert_eq!(ids, vec!["T1", "T2", "T3"]);
}

#[test]
fn scenario_filter_is_exact() {
    let s = seeded();
    let ids = timeline(&s, ScenarioFilter::parse("crypto_sanctions")).unwrap();
    assert_eq!(ids, vec!["T2", "T3"]);

    let none = timeline(&s, ScenarioFilter::parse("Crypto_Sanctions")).unwrap();
    assert!(none.is_empty(), "Filter should be case-sensitive");
}

#[test]
fn entries_carry_numeric_fields() {
    let s = seeded();
    let filter = ScenarioFilter::All;
    let entries = project_timeline(&filter, &s.timeline_transactions(&filter).unwrap()).unwrap();
    assert_eq!(entries[0].amount, 250.0);
    assert_eq!(entries[0].suspicious_score, 0.4);
    assert_eq!(entries[0].from_account.as_deref(), Some("ACC_A"));
}

#[test]
fn numeric_text_is_accepted() {
    let s = store();
    s.insert_transaction(&TransactionRecord {
        amount: Some("125.5".into()),
        ..record("T1", "2024-01-01T00:00:00", "baseline")
    })
    .unwrap();
    let filter = ScenarioFilter::All;
    let entries = project_timeline(&filter, &s.timeline_transactions(&filter).unwrap()).unwrap();
    assert_eq!(entries[0].amount, 125.5);
}

#[test]
fn non_numeric_amount_fails_the_whole_request() {
    let s = seeded();
    s.insert_transaction(&TransactionRecord {
        amount: Some("not_a_number".into()),
        ..record("BAD", "2024-01-04T00:00:00", "crypto_sanctions")
    })
    .unwrap();

    match timeline(&s, ScenarioFilter::All) {
        Err(MonitorError::InvalidNumeric { transaction_id, field, value }) => {
            assert_eq!(transaction_id, "BAD");
            assert_eq!(field, "amount");
            assert_eq!(value, "not_a_number");
        }
        other => panic!("Expected InvalidNumeric, got {other:?}"),
    }

    // Other scenarios are unaffected.
    let ids = timeline(&s, ScenarioFilter::parse("terrorist_financing")).unwrap();
    assert_eq!(ids, vec!["T1"]);
}

#[test]
fn missing_score_fails_the_request() {
    let s = store();
    s.insert_transaction(&TransactionRecord {
        suspicious_score: None,
        ..record("NOSCORE", "2024-01-01T00:00:00", "baseline")
    })
    .unwrap();

    let result = timeline(&s, ScenarioFilter::All);
    assert!(
        matches!(result, Err(MonitorError::MissingNumeric { field: "suspicious_score", .. })),
        "Expected MissingNumeric, got {result:?}"
    );
}

#[test]
fn records_without_timestamp_sort_first() {
    let records = vec![
        record("T2", "2024-01-02T00:00:00", "baseline"),
        TransactionRecord {
            timestamp: None,
            ..record("T0", "", "baseline")
        },
        record("T1", "2024-01-01T00:00:00", "baseline"),
    ];
    let entries = project_timeline(&ScenarioFilter::All, &records).unwrap();
    let ids: Vec<_> = entries.iter().filter_map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, vec!["T0", "T1", "T2"]);
}

#[test]
fn empty_store_gives_empty_timeline() {
    assert!(timeline(&store(), ScenarioFilter::All).unwrap().is_empty());
}
