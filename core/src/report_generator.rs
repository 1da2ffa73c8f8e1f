//! SAR generation: turns a pattern classification and a bounded list of
//! transactions into a [`GeneratedReport`].
//!
//! Generation is lenient and never fails on partial bad data:
//!   - missing or unparseable amounts and scores count as 0
//!   - any unparseable timestamp degrades the time period to "Unknown"
//!   - unknown scenarios fall back to the default template, indicators
//!     and recommendations
//!
//! The only input besides the arguments is the injected clock.

use crate::{
    clock::{Clock, SystemClock},
    config::{Priority, ReportConfig},
    sar_report::{
        GeneratedReport, PatternClassification, RegulatoryCompliance, ReportAttachments,
        ReportDetails, ReportEvidence,
    },
    transaction::TransactionRecord,
    types::AccountId,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

// ── Constants ────────────────────────────────────────────────────────────────

const SUSPICIOUS_SCORE_THRESHOLD: f64 = 0.5; // score > 0.5 counts as suspicious
const HIGH_AVG_SUSPICION: f64 = 0.7;
const LARGE_AMOUNT_THRESHOLD: f64 = 10_000.0;
const HIGH_FREQUENCY_COUNT: usize = 50;

const EVIDENCE_SAMPLE_SIZE: usize = 10;
const MAX_ACCOUNTS_LISTED: usize = 20;

pub const UNKNOWN_PERIOD: &str = "Unknown";

pub const RISK_HIGH_AVG_SUSPICION: &str = "High average suspicious activity score";
pub const RISK_LARGE_AMOUNTS: &str = "Large individual transaction amounts";
pub const RISK_HIGH_FREQUENCY: &str = "High transaction frequency";

// ── Statistics ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionStats {
    pub count: usize,
    pub total_amount: f64,
    /// 0.0 for an empty list.
    pub average_amount: f64,
    pub suspicious_count: usize,
}

impl TransactionStats {
    pub fn compute(transactions: &[TransactionRecord]) -> Self {
        let count = transactions.len();
        let total_amount: f64 = transactions.iter().map(|t| t.amount_or_zero()).sum();
        let average_amount = if count > 0 {
            total_amount / count as f64
        } else {
            0.0
        };
        let suspicious_count = transactions
            .iter()
            .filter(|t| t.score_or_zero() > SUSPICIOUS_SCORE_THRESHOLD)
            .count();
        Self {
            count,
            total_amount,
            average_amount,
            suspicious_count,
        }
    }
}

// ── Generator ────────────────────────────────────────────────────────────────

pub struct ReportGenerator {
    config: ReportConfig,
    clock: Box<dyn Clock>,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: ReportConfig, clock: Box<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn generate_report(
        &self,
        classification: &PatternClassification,
        transactions: &[TransactionRecord],
    ) -> GeneratedReport {
        let now = self.clock.now();
        let scenario = classification.scenario_key();

        let (template, fell_back) = self.config.template_for(scenario);
        if fell_back {
            log::warn!(
                "No SAR template for scenario '{}', using '{}'",
                scenario,
                self.config.default_scenario()
            );
        }

        let stats = TransactionStats::compute(transactions);

        log::debug!(
            "Generating SAR for '{}': {} transactions, {} suspicious, total {:.2}",
            scenario,
            stats.count,
            stats.suspicious_count,
            stats.total_amount
        );

        GeneratedReport {
            report_id: report_id(now),
            generated_at: now,
            title: template.title.clone(),
            priority: template.priority,
            summary: template.summary.clone(),
            details: ReportDetails {
                pattern_type: scenario.to_string(),
                total_transactions: stats.count,
                suspicious_count: stats.suspicious_count,
                total_amount: stats.total_amount,
                average_amount: stats.average_amount,
                time_period: time_period(transactions),
                accounts_involved: accounts_involved(transactions),
            },
            evidence: ReportEvidence {
                transaction_ids: transactions
                    .iter()
                    .take(EVIDENCE_SAMPLE_SIZE)
                    .map(TransactionRecord::evidence_id)
                    .collect(),
                pattern_indicators: self.config.indicators_for(scenario).to_vec(),
                risk_factors: risk_factors(transactions),
            },
            regulatory_compliance: RegulatoryCompliance {
                codes: template.regulatory_codes.clone(),
                filing_deadline: filing_deadline(now, self.config.filing_window_days()),
                law_enforcement_notification: template.priority == Priority::Critical,
            },
            recommendations: self.config.recommendations_for(scenario).to_vec(),
            attachments: ReportAttachments::for_scenario(scenario),
        }
    }
}

/// `SAR_<YYYYMMDD_HHMMSS>`. Two reports in the same second share an id.
pub fn report_id(now: NaiveDateTime) -> String {
    format!("SAR_{}", now.format("%Y%m%d_%H%M%S"))
}

fn filing_deadline(now: NaiveDateTime, window_days: i64) -> String {
    (now + Duration::days(window_days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Distinct from/to accounts, at most MAX_ACCOUNTS_LISTED of them.
pub fn accounts_involved(transactions: &[TransactionRecord]) -> Vec<AccountId> {
    let accounts: BTreeSet<&str> = transactions
        .iter()
        .flat_map(|t| [t.from_account.as_deref(), t.to_account.as_deref()])
        .flatten()
        .filter(|a| !a.is_empty())
        .collect();
    accounts
        .into_iter()
        .take(MAX_ACCOUNTS_LISTED)
        .map(str::to_string)
        .collect()
}

pub fn risk_factors(transactions: &[TransactionRecord]) -> Vec<String> {
    let mut factors = Vec::new();
    if transactions.is_empty() {
        return factors;
    }

    let avg_suspicion = transactions.iter().map(|t| t.score_or_zero()).sum::<f64>()
        / transactions.len() as f64;
    if avg_suspicion > HIGH_AVG_SUSPICION {
        factors.push(RISK_HIGH_AVG_SUSPICION.to_string());
    }

    let max_amount = transactions
        .iter()
        .map(|t| t.amount_or_zero())
        .fold(f64::NEG_INFINITY, f64::max);
    if max_amount > LARGE_AMOUNT_THRESHOLD {
        factors.push(RISK_LARGE_AMOUNTS.to_string());
    }

    if transactions.len() > HIGH_FREQUENCY_COUNT {
        factors.push(RISK_HIGH_FREQUENCY.to_string());
    }

    factors
}

// ── Time period ──────────────────────────────────────────────────────────────

/// A parsed timestamp. Offset-less and offset-carrying values cannot be
/// ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParsedTimestamp {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_timestamp(raw: &str) -> Option<ParsedTimestamp> {
    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(ParsedTimestamp::Aware(dt));
    }
    if let Some(dt) = AWARE_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(&normalized, f).ok())
    {
        return Some(ParsedTimestamp::Aware(dt));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(&normalized, f).ok())
    {
        return Some(ParsedTimestamp::Naive(dt));
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(ParsedTimestamp::Naive)
}

/// Span covered by the transactions' timestamps.
///
/// Records without a timestamp are skipped. If none remain, or any remaining
/// timestamp fails to parse, or naive and offset timestamps are mixed, the
/// result is "Unknown".
pub fn time_period(transactions: &[TransactionRecord]) -> String {
    let raw: Vec<&str> = transactions
        .iter()
        .filter_map(|t| t.timestamp.as_deref())
        .filter(|ts| !ts.is_empty())
        .collect();
    if raw.is_empty() {
        return UNKNOWN_PERIOD.to_string();
    }

    let mut naive = Vec::new();
    let mut aware = Vec::new();
    for ts in raw {
        match parse_timestamp(ts) {
            Some(ParsedTimestamp::Naive(dt)) => naive.push(dt),
            Some(ParsedTimestamp::Aware(dt)) => aware.push(dt),
            None => {
                log::warn!("Unparseable timestamp '{}', time period unknown", ts);
                return UNKNOWN_PERIOD.to_string();
            }
        }
    }

    let described = match (naive.is_empty(), aware.is_empty()) {
        (false, true) => describe_span(&naive, |a, b| (b - a).num_days(), |d| {
            d.format("%Y-%m-%d").to_string()
        }),
        (true, false) => describe_span(&aware, |a, b| (b - a).num_days(), |d| {
            d.format("%Y-%m-%d").to_string()
        }),
        _ => {
            log::warn!("Mixed naive and offset timestamps, time period unknown");
            None
        }
    };
    described.unwrap_or_else(|| UNKNOWN_PERIOD.to_string())
}

fn describe_span<T: Copy + Ord>(
    items: &[T],
    days_between: impl Fn(T, T) -> i64,
    date: impl Fn(T) -> String,
) -> Option<String> {
    let min = *items.iter().min()?;
    let max = *items.iter().max()?;
    Some(format!(
        "{} days ({} to {})",
        days_between(min, max),
        date(min),
        date(max)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> TransactionRecord {
        TransactionRecord {
            timestamp: Some(ts.into()),
            ..Default::default()
        }
    }

    #[test]
    fn utc_suffix_is_normalized() {
        let txns = [at("2024-01-01T00:00:00Z"), at("2024-01-31T00:00:00Z")];
        assert_eq!(time_period(&txns), "30 days (2024-01-01 to 2024-01-31)");
    }

    #[test]
    fn naive_timestamps_with_fractions_parse() {
        let txns = [
            at("2024-03-10T08:15:00.123456"),
            at("2024-03-01T23:59:59.5"),
            at("2024-03-05 12:00:00"),
        ];
        // 8 days 8h15m → whole days only
        assert_eq!(time_period(&txns), "8 days (2024-03-01 to 2024-03-10)");
    }

    #[test]
    fn partial_day_spans_truncate() {
        let txns = [at("2024-01-01T00:00:00Z"), at("2024-01-01T23:00:00Z")];
        assert_eq!(time_period(&txns), "0 days (2024-01-01 to 2024-01-01)");
    }

    #[test]
    fn any_bad_timestamp_makes_period_unknown() {
        let txns = [at("2024-01-01T00:00:00Z"), at("yesterday")];
        assert_eq!(time_period(&txns), UNKNOWN_PERIOD);
    }

    #[test]
    fn mixed_naive_and_aware_is_unknown() {
        let txns = [at("2024-01-01T00:00:00Z"), at("2024-01-02T00:00:00")];
        assert_eq!(time_period(&txns), UNKNOWN_PERIOD);
    }

    #[test]
    fn missing_timestamps_are_skipped() {
        let txns = [
            TransactionRecord::default(),
            at(""),
            at("2024-02-01T00:00:00+02:00"),
        ];
        assert_eq!(time_period(&txns), "0 days (2024-02-01 to 2024-02-01)");
        assert_eq!(time_period(&[TransactionRecord::default()]), UNKNOWN_PERIOD);
    }

    #[test]
    fn minute_precision_timestamps_parse() {
        let txns = [at("2024-01-01 10:30"), at("2024-01-05 10:30")];
        assert_eq!(time_period(&txns), "4 days (2024-01-01 to 2024-01-05)");
        let txns = [at("2024-01-01 10:30+02:00"), at("2024-01-03 10:30+02:00")];
        assert_eq!(time_period(&txns), "2 days (2024-01-01 to 2024-01-03)");
    }

    #[test]
    fn report_id_has_second_resolution() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(report_id(now), "SAR_20250601_090507");
        assert_eq!(filing_deadline(now, 30), "2025-07-01");
    }
}
