//! Timeline projection: chronological, flat view of transactions.
//!
//! Unlike report generation, numeric coercion here is strict: one record
//! with a missing or non-numeric amount or score fails the whole request.

use crate::{
    error::MonitorResult,
    transaction::TransactionRecord,
    types::{AccountId, ALL_SCENARIOS},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioFilter {
    All,
    Scenario(String),
}

impl ScenarioFilter {
    /// `"all"` selects everything; any other value is an exact,
    /// case-sensitive scenario match.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_SCENARIOS {
            Self::All
        } else {
            Self::Scenario(raw.to_string())
        }
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            Self::All => true,
            Self::Scenario(s) => record.scenario.as_deref() == Some(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub from_account: Option<AccountId>,
    pub to_account: Option<AccountId>,
    pub amount: f64,
    pub suspicious_score: f64,
    pub pattern_type: Option<String>,
    pub scenario: Option<String>,
}

impl TimelineEntry {
    pub fn project(record: &TransactionRecord) -> MonitorResult<Self> {
        Ok(Self {
            id: record.transaction_id.clone(),
            timestamp: record.timestamp.clone(),
            from_account: record.from_account.clone(),
            to_account: record.to_account.clone(),
            amount: record.amount_strict()?,
            suspicious_score: record.score_strict()?,
            pattern_type: record.pattern_type.clone(),
            scenario: record.scenario.clone(),
        })
    }
}

/// Filter, order ascending by timestamp string (stable; records without a
/// timestamp first), and project.
pub fn project_timeline(
    filter: &ScenarioFilter,
    transactions: &[TransactionRecord],
) -> MonitorResult<Vec<TimelineEntry>> {
    let mut selected: Vec<&TransactionRecord> =
        transactions.iter().filter(|t| filter.matches(t)).collect();
    selected.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    selected.into_iter().map(TimelineEntry::project).collect()
}
