//! Pattern statistics: transactions grouped by (pattern_type, scenario).
//!
//! Averages follow SQL AVG semantics: records without a value are left out
//! of that average, unparseable text counts as 0. A group with no values at
//! all averages to 0.

use crate::transaction::{FieldValue, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub pattern_type: Option<String>,
    pub scenario: Option<String>,
    pub transaction_count: usize,
    pub avg_suspicion: f64,
    pub avg_amount: f64,
}

#[derive(Default)]
struct RunningMean {
    sum: f64,
    n: usize,
}

impl RunningMean {
    fn push(&mut self, value: Option<&FieldValue>) {
        if let Some(v) = value {
            self.sum += v.as_f64().unwrap_or(0.0);
            self.n += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }
}

#[derive(Default)]
struct Group {
    count: usize,
    suspicion: RunningMean,
    amount: RunningMean,
}

/// One summary per (pattern_type, scenario) present in `transactions`,
/// ordered by key.
pub fn aggregate_patterns(transactions: &[TransactionRecord]) -> Vec<PatternSummary> {
    let mut groups: BTreeMap<(Option<&str>, Option<&str>), Group> = BTreeMap::new();
    for txn in transactions {
        let group = groups
            .entry((txn.pattern_type.as_deref(), txn.scenario.as_deref()))
            .or_default();
        group.count += 1;
        group.suspicion.push(txn.suspicious_score.as_ref());
        group.amount.push(txn.amount.as_ref());
    }

    groups
        .into_iter()
        .map(|((pattern_type, scenario), g)| PatternSummary {
            pattern_type: pattern_type.map(str::to_string),
            scenario: scenario.map(str::to_string),
            transaction_count: g.count,
            avg_suspicion: g.suspicion.mean(),
            avg_amount: g.amount.mean(),
        })
        .collect()
}
