//! Synthetic transaction dataset for demos and local runs.
//!
//! Three suspicious storylines plus baseline traffic, each drawn from its
//! own deterministic stream so the same seed always yields the same rows
//! (timestamps are relative to the `now` the generator is built with).

use crate::{
    error::MonitorResult,
    rng::{ScenarioRng, ScenarioSlot},
    store::TransactionStore,
    transaction::{FieldValue, TransactionRecord},
    types::{BASELINE, CRYPTO_SANCTIONS, HUMAN_TRAFFICKING, TERRORIST_FINANCING},
};
use chrono::{Duration, NaiveDateTime};

pub const SUSPICIOUS_SCENARIO_SIZE: usize = 150;
pub const BASELINE_SIZE: usize = 300;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const TERROR_CELL_ACCOUNT: &str = "TERROR_CELL_001";

/// Fixed characteristics of one storyline.
struct Storyline {
    id_prefix: &'static str,
    scenario: &'static str,
    pattern_type: &'static str,
    transaction_type: &'static str,
    lookback_days: i64,
    step_hours: i64,
    amount: (f64, f64),
    score: (f64, f64),
}

const TERRORIST_FINANCING_STORY: Storyline = Storyline {
    id_prefix: "TF",
    scenario: TERRORIST_FINANCING,
    pattern_type: "micro_donations",
    transaction_type: "transfer",
    lookback_days: 30,
    step_hours: 1,
    amount: (50.0, 500.0),
    score: (0.6, 0.9),
};

const CRYPTO_SANCTIONS_STORY: Storyline = Storyline {
    id_prefix: "CS",
    scenario: CRYPTO_SANCTIONS,
    pattern_type: "layering",
    transaction_type: "crypto_transfer",
    lookback_days: 7,
    step_hours: 2,
    amount: (1000.0, 50000.0),
    score: (0.7, 0.95),
};

const HUMAN_TRAFFICKING_STORY: Storyline = Storyline {
    id_prefix: "HT",
    scenario: HUMAN_TRAFFICKING,
    pattern_type: "network_distribution",
    transaction_type: "cash_transfer",
    lookback_days: 60,
    step_hours: 6,
    amount: (2000.0, 15000.0),
    score: (0.5, 0.8),
};

const BASELINE_STORY: Storyline = Storyline {
    id_prefix: "NORM",
    scenario: BASELINE,
    pattern_type: "normal",
    transaction_type: "transfer",
    lookback_days: 30,
    step_hours: 1,
    amount: (100.0, 10000.0),
    score: (0.1, 0.3),
};

impl ScenarioSlot {
    fn storyline(&self) -> &'static Storyline {
        match self {
            Self::TerroristFinancing => &TERRORIST_FINANCING_STORY,
            Self::CryptoSanctions => &CRYPTO_SANCTIONS_STORY,
            Self::HumanTrafficking => &HUMAN_TRAFFICKING_STORY,
            Self::Baseline | Self::Adversarial => &BASELINE_STORY,
        }
    }
}

pub struct SyntheticGenerator {
    seed: u64,
    now: NaiveDateTime,
}

impl SyntheticGenerator {
    pub fn new(seed: u64, now: NaiveDateTime) -> Self {
        Self { seed, now }
    }

    /// `n` transactions for `scenario`; unknown scenarios yield baseline traffic.
    pub fn generate_scenario(&self, scenario: &str, n: usize) -> Vec<TransactionRecord> {
        let slot = ScenarioSlot::for_scenario(scenario);
        let story = slot.storyline();
        let mut rng = slot.rng(self.seed);
        let base_time = self.now - Duration::days(story.lookback_days);
        log::debug!("stream '{}': generating {} rows", rng.name, n);

        (0..n)
            .map(|i| {
                let (from_account, to_account) = counterparties(slot, i, &mut rng);
                let timestamp = base_time + Duration::hours(i as i64 * story.step_hours);
                TransactionRecord {
                    id: None,
                    transaction_id: Some(format!("{}_{:04}", story.id_prefix, i)),
                    timestamp: Some(timestamp.format(TIMESTAMP_FORMAT).to_string()),
                    from_account: Some(from_account),
                    to_account: Some(to_account),
                    amount: Some(FieldValue::Real(rng.uniform(story.amount.0, story.amount.1))),
                    transaction_type: Some(story.transaction_type.to_string()),
                    suspicious_score: Some(FieldValue::Real(
                        rng.uniform(story.score.0, story.score.1),
                    )),
                    pattern_type: Some(story.pattern_type.to_string()),
                    scenario: Some(story.scenario.to_string()),
                }
            })
            .collect()
    }

    /// The full demo dataset: every suspicious storyline plus baseline traffic.
    pub fn generate_all(&self) -> Vec<TransactionRecord> {
        let mut all = Vec::with_capacity(3 * SUSPICIOUS_SCENARIO_SIZE + BASELINE_SIZE);
        for scenario in [TERRORIST_FINANCING, CRYPTO_SANCTIONS, HUMAN_TRAFFICKING] {
            all.extend(self.generate_scenario(scenario, SUSPICIOUS_SCENARIO_SIZE));
        }
        all.extend(self.generate_scenario(BASELINE, BASELINE_SIZE));
        all
    }
}

fn counterparties(slot: ScenarioSlot, i: usize, rng: &mut ScenarioRng) -> (String, String) {
    match slot {
        ScenarioSlot::TerroristFinancing => {
            let to = if i % 3 == 0 {
                TERROR_CELL_ACCOUNT.to_string()
            } else {
                format!("SHELL_{:02}", i % 10)
            };
            (format!("DONOR_{:03}", i % 50), to)
        }
        ScenarioSlot::CryptoSanctions => {
            let to = if i % 4 == 0 {
                format!("MIXER_{:02}", i % 5)
            } else {
                format!("EXCHANGE_{:02}", i % 8)
            };
            (format!("WALLET_{:03}", i % 20), to)
        }
        ScenarioSlot::HumanTrafficking => (
            format!("FRONT_BUSINESS_{:02}", i % 15),
            format!("HANDLER_{:02}", i % 8),
        ),
        ScenarioSlot::Baseline | ScenarioSlot::Adversarial => (iban(rng), iban(rng)),
    }
}

/// IBAN-shaped account number; not checksum-valid.
fn iban(rng: &mut ScenarioRng) -> String {
    format!(
        "GB{:02}TRNB{:014}",
        rng.next_u64_below(100),
        rng.next_u64_below(100_000_000_000_000)
    )
}

/// Write the full demo dataset. Returns rows inserted.
pub fn populate(store: &TransactionStore, generator: &SyntheticGenerator) -> MonitorResult<usize> {
    let inserted = store.insert_transactions(&generator.generate_all())?;
    log::info!("Generated {} synthetic transactions", inserted);
    Ok(inserted)
}

/// Seed the store only if the transactions table is empty.
/// Returns rows inserted (0 when data was already present).
pub fn init_database(
    store: &TransactionStore,
    generator: &SyntheticGenerator,
) -> MonitorResult<usize> {
    let existing = store.transaction_count()?;
    if existing > 0 {
        log::info!("Database already contains {} transactions", existing);
        return Ok(0);
    }
    log::info!("Initializing transaction database");
    populate(store, generator)
}
