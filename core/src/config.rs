//! Report tables: SAR templates, pattern indicators and recommendations.
//!
//! Loaded once at process start, either from the data/ directory
//! (`ReportConfig::load`) or from the compiled-in tables
//! (`ReportConfig::builtin`). Never mutated afterwards.

use crate::types::{ScenarioKey, CRYPTO_SANCTIONS, HUMAN_TRAFFICKING, TERRORIST_FINANCING};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub title: String,
    pub summary: String,
    pub priority: Priority,
    pub regulatory_codes: Vec<String>,
}

/// Parameters of the store query that feeds a SAR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportQueryConfig {
    /// Only transactions scoring strictly above this are pulled into a report.
    pub min_suspicious_score: f64,
    /// Hard cap on transactions per report.
    pub transaction_limit: usize,
}

impl Default for ReportQueryConfig {
    fn default() -> Self {
        Self {
            min_suspicious_score: 0.5,
            transaction_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TemplateEntry {
    scenario: ScenarioKey,
    #[serde(flatten)]
    template: ReportTemplate,
}

#[derive(Debug, Clone, Deserialize)]
struct TemplatesFile {
    default_scenario: ScenarioKey,
    #[serde(default = "default_filing_window")]
    filing_window_days: i64,
    #[serde(default)]
    query: ReportQueryConfig,
    templates: Vec<TemplateEntry>,
}

/// Shape shared by indicators.json and recommendations.json.
#[derive(Debug, Clone, Deserialize)]
struct ScenarioListFile {
    default: Vec<String>,
    scenarios: HashMap<ScenarioKey, Vec<String>>,
}

fn default_filing_window() -> i64 {
    30
}

/// Accepted range for `filing_window_days`.
pub const FILING_WINDOW_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

/// Validated report tables. Only constructed through [`ReportConfig::load`]
/// or [`ReportConfig::builtin`], so the default template always exists.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    templates: BTreeMap<ScenarioKey, ReportTemplate>,
    indicators: HashMap<ScenarioKey, Vec<String>>,
    recommendations: HashMap<ScenarioKey, Vec<String>>,
    /// Template used when a scenario has none of its own.
    default_scenario: ScenarioKey,
    default_indicators: Vec<String>,
    default_recommendations: Vec<String>,
    /// Days between report generation and the filing deadline.
    filing_window_days: i64,
    query: ReportQueryConfig,
}

impl ReportConfig {
    /// Load from the data/ directory.
    /// Without a data directory, use ReportConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let templates_path = format!("{data_dir}/reports/sar_templates.json");
        let templates_content = std::fs::read_to_string(&templates_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {templates_path}: {e}"))?;
        let templates_file: TemplatesFile = parse(&templates_path, &templates_content)?;
        let templates = templates_file
            .templates
            .into_iter()
            .map(|t| (t.scenario, t.template))
            .collect();

        let indicators_path = format!("{data_dir}/reports/indicators.json");
        let indicators_content = std::fs::read_to_string(&indicators_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {indicators_path}: {e}"))?;
        let indicators_file: ScenarioListFile = parse(&indicators_path, &indicators_content)?;

        let recs_path = format!("{data_dir}/reports/recommendations.json");
        let recs_content = std::fs::read_to_string(&recs_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {recs_path}: {e}"))?;
        let recs_file: ScenarioListFile = parse(&recs_path, &recs_content)?;

        let config = Self {
            templates,
            indicators: indicators_file.scenarios,
            recommendations: recs_file.scenarios,
            default_scenario: templates_file.default_scenario,
            default_indicators: indicators_file.default,
            default_recommendations: recs_file.default,
            filing_window_days: templates_file.filing_window_days,
            query: templates_file.query,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.templates.contains_key(&self.default_scenario) {
            anyhow::bail!(
                "Default scenario '{}' has no SAR template",
                self.default_scenario
            );
        }
        if self.query.transaction_limit == 0 {
            anyhow::bail!("Report transaction_limit must be positive");
        }
        if !FILING_WINDOW_RANGE.contains(&self.filing_window_days) {
            anyhow::bail!(
                "filing_window_days {} outside {:?}",
                self.filing_window_days,
                FILING_WINDOW_RANGE
            );
        }
        Ok(())
    }

    pub fn templates(&self) -> &BTreeMap<ScenarioKey, ReportTemplate> {
        &self.templates
    }

    pub fn default_scenario(&self) -> &str {
        &self.default_scenario
    }

    pub fn default_indicators(&self) -> &[String] {
        &self.default_indicators
    }

    pub fn default_recommendations(&self) -> &[String] {
        &self.default_recommendations
    }

    pub fn filing_window_days(&self) -> i64 {
        self.filing_window_days
    }

    pub fn query(&self) -> &ReportQueryConfig {
        &self.query
    }

    /// Template for `scenario`, falling back to the default scenario's.
    /// The flag is true when the fallback was taken.
    pub fn template_for(&self, scenario: &str) -> (&ReportTemplate, bool) {
        match self.templates.get(scenario) {
            Some(t) => (t, false),
            None => (&self.templates[&self.default_scenario], true),
        }
    }

    pub fn indicators_for(&self, scenario: &str) -> &[String] {
        self.indicators
            .get(scenario)
            .unwrap_or(&self.default_indicators)
    }

    pub fn recommendations_for(&self, scenario: &str) -> &[String] {
        self.recommendations
            .get(scenario)
            .unwrap_or(&self.default_recommendations)
    }

    /// The compiled-in tables. data/reports/*.json mirrors these.
    pub fn builtin() -> Self {
        let templates = [
            (
                TERRORIST_FINANCING,
                ReportTemplate {
                    title: "Suspected Terrorist Financing Activity".into(),
                    summary: "Multiple small-value transactions from various sources converging to potential terror-linked accounts".into(),
                    priority: Priority::High,
                    regulatory_codes: vec!["31.a".into(), "31.b".into()],
                },
            ),
            (
                CRYPTO_SANCTIONS,
                ReportTemplate {
                    title: "Sanctions Evasion via Cryptocurrency".into(),
                    summary: "Large-value cryptocurrency transactions through mixing services to evade sanctions".into(),
                    priority: Priority::Critical,
                    regulatory_codes: vec!["20.a".into(), "25.c".into()],
                },
            ),
            (
                HUMAN_TRAFFICKING,
                ReportTemplate {
                    title: "Human Trafficking Network Activity".into(),
                    summary: "Cash-intensive transactions between front businesses and known trafficking handlers".into(),
                    priority: Priority::High,
                    regulatory_codes: vec!["35.a".into(), "35.b".into()],
                },
            ),
        ]
        .into_iter()
        .map(|(k, t)| (k.to_string(), t))
        .collect();

        let indicators = table(&[
            (
                TERRORIST_FINANCING,
                [
                    "Multiple small-value donations",
                    "Geographic clustering of sources",
                    "Timing patterns suggesting coordination",
                    "Convergence to limited target accounts",
                ],
            ),
            (
                CRYPTO_SANCTIONS,
                [
                    "Use of cryptocurrency mixing services",
                    "Rapid conversion between currencies",
                    "High-value transactions to known sanctioned entities",
                    "Layering through multiple exchanges",
                ],
            ),
            (
                HUMAN_TRAFFICKING,
                [
                    "Cash-intensive business operations",
                    "Geographic movement patterns",
                    "Transactions to known handler networks",
                    "Front business involvement",
                ],
            ),
        ]);

        let recommendations = table(&[
            (
                TERRORIST_FINANCING,
                [
                    "Immediately freeze all related accounts",
                    "Notify law enforcement and counter-terrorism units",
                    "Conduct enhanced due diligence on all involved parties",
                    "Monitor for additional related transactions",
                ],
            ),
            (
                CRYPTO_SANCTIONS,
                [
                    "Block all cryptocurrency transactions to flagged addresses",
                    "Report to OFAC and relevant sanctions authorities",
                    "Conduct enhanced screening of all crypto activities",
                    "Implement additional controls for cryptocurrency transactions",
                ],
            ),
            (
                HUMAN_TRAFFICKING,
                [
                    "Coordinate with human trafficking task forces",
                    "Monitor all related business accounts for additional activity",
                    "Conduct enhanced due diligence on business relationships",
                    "Report to National Human Trafficking Hotline",
                ],
            ),
        ]);

        Self {
            templates,
            indicators,
            recommendations,
            default_scenario: TERRORIST_FINANCING.into(),
            default_indicators: vec!["Suspicious transaction patterns detected".into()],
            default_recommendations: vec![
                "Conduct enhanced monitoring of flagged accounts".into(),
                "Report to appropriate law enforcement agencies".into(),
                "Implement additional transaction controls".into(),
            ],
            filing_window_days: default_filing_window(),
            query: ReportQueryConfig::default(),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> anyhow::Result<T> {
    serde_json::from_str(content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}

fn table<const N: usize>(rows: &[(&str, [&str; N])]) -> HashMap<ScenarioKey, Vec<String>> {
    rows.iter()
        .map(|(k, items)| (k.to_string(), items.iter().map(|s| s.to_string()).collect()))
        .collect()
}
