//! Suspicious Activity Report: the generator's output document.
//!
//! Every struct here serializes straight to the JSON the API returns;
//! field names are part of the external contract.

use crate::{
    config::Priority,
    types::{AccountId, ScenarioKey, TransactionId, UNKNOWN_SCENARIO},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What the caller knows about the detected pattern. Only the scenario
/// drives report generation; any other keys a caller sends are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternClassification {
    #[serde(default)]
    pub scenario: Option<ScenarioKey>,
}

impl PatternClassification {
    pub fn for_scenario(scenario: &str) -> Self {
        Self {
            scenario: Some(scenario.to_string()),
        }
    }

    /// The scenario key, or `"unknown"` when none was given.
    pub fn scenario_key(&self) -> &str {
        self.scenario.as_deref().unwrap_or(UNKNOWN_SCENARIO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report_id: String,
    pub generated_at: NaiveDateTime,
    pub title: String,
    pub priority: Priority,
    pub summary: String,
    pub details: ReportDetails,
    pub evidence: ReportEvidence,
    pub regulatory_compliance: RegulatoryCompliance,
    pub recommendations: Vec<String>,
    pub attachments: ReportAttachments,
}

/// Figures derived solely from the input transaction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetails {
    pub pattern_type: ScenarioKey,
    pub total_transactions: usize,
    #[serde(alias = "suspicious_transactions")]
    pub suspicious_count: usize,
    pub total_amount: f64,
    pub average_amount: f64,
    /// `"<days> days (<from> to <to>)"` or `"Unknown"`.
    pub time_period: String,
    pub accounts_involved: Vec<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEvidence {
    pub transaction_ids: Vec<TransactionId>,
    pub pattern_indicators: Vec<String>,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryCompliance {
    pub codes: Vec<String>,
    /// YYYY-MM-DD
    pub filing_deadline: String,
    pub law_enforcement_notification: bool,
}

/// Names of the companion documents. No files are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAttachments {
    pub transaction_timeline: String,
    pub network_analysis: String,
    pub statistical_summary: String,
}

impl ReportAttachments {
    pub fn for_scenario(scenario: &str) -> Self {
        Self {
            transaction_timeline: format!("chronos_timeline_{scenario}.pdf"),
            network_analysis: format!("hydra_analysis_{scenario}.pdf"),
            statistical_summary: format!("stats_{scenario}.xlsx"),
        }
    }
}
