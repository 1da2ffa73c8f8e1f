//! Request boundary: the operations the API exposes, wrapped in the
//! `{"status": "success" | "error", ...}` envelope.
//!
//! Every failure below this point is a `MonitorError`; here it becomes a
//! two-field error envelope. No partial results are ever returned.

use crate::{
    config::ReportTemplate,
    error::{MonitorError, MonitorResult},
    hydra::{
        AdversarialPattern, DetectionRequest, DetectionResult, HydraEngine, SimulationSummary,
        DEFAULT_SIMULATION_ROUNDS,
    },
    pattern_aggregator::{aggregate_patterns, PatternSummary},
    report_generator::ReportGenerator,
    sar_report::{GeneratedReport, PatternClassification},
    store::TransactionStore,
    timeline::{project_timeline, ScenarioFilter, TimelineEntry},
    types::{ScenarioKey, ALL_SCENARIOS},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SERVICE_NAME: &str = "TriNetra API";

// ── Envelope & payloads ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApiResponse<T> {
    Success(T),
    Error { message: String },
}

impl<T> From<MonitorResult<T>> for ApiResponse<T> {
    fn from(result: MonitorResult<T>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(e) => {
                log::warn!("Request rejected: {}", e);
                Self::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelinePayload {
    pub data: Vec<TimelineEntry>,
    pub total_transactions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternsPayload {
    pub patterns: Vec<PatternSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarPayload {
    pub sar_report: GeneratedReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplatesPayload {
    pub templates: BTreeMap<ScenarioKey, ReportTemplate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HydraPatternPayload {
    pub pattern: AdversarialPattern,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionPayload {
    pub detection: DetectionResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationPayload {
    pub simulation: SimulationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

/// Requests accepted by [`MonitoringService::handle`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceRequest {
    Timeline {
        #[serde(default)]
        scenario: Option<String>,
    },
    Patterns,
    GenerateSar {
        #[serde(default)]
        pattern: Option<Value>,
    },
    Templates,
    Health,
    HydraGenerate,
    HydraDetect {
        #[serde(default)]
        pattern: Option<Value>,
    },
    HydraSimulation {
        #[serde(default = "default_rounds")]
        rounds: usize,
    },
}

fn default_rounds() -> usize {
    DEFAULT_SIMULATION_ROUNDS
}

// ── Service ──────────────────────────────────────────────────────────────────

pub struct MonitoringService {
    store: TransactionStore,
    generator: ReportGenerator,
    hydra: HydraEngine,
}

impl MonitoringService {
    pub fn new(store: TransactionStore, generator: ReportGenerator, hydra: HydraEngine) -> Self {
        Self {
            store,
            generator,
            hydra,
        }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn generator(&self) -> &ReportGenerator {
        &self.generator
    }

    /// Timeline for one scenario, or every scenario when `None` / `"all"`.
    pub fn timeline(&self, scenario: Option<&str>) -> MonitorResult<TimelinePayload> {
        let filter = ScenarioFilter::parse(scenario.unwrap_or(ALL_SCENARIOS));
        let records = self.store.timeline_transactions(&filter)?;
        let data = project_timeline(&filter, &records)?;
        log::info!("timeline {:?}: {} entries", filter, data.len());
        Ok(TimelinePayload {
            total_transactions: data.len(),
            data,
        })
    }

    pub fn patterns(&self) -> MonitorResult<PatternsPayload> {
        let records = self.store.all_transactions()?;
        let patterns = aggregate_patterns(&records);
        log::info!(
            "patterns: {} groups over {} transactions",
            patterns.len(),
            records.len()
        );
        Ok(PatternsPayload { patterns })
    }

    /// Generate a SAR from a request body shaped `{"pattern": {"scenario": ...}}`.
    ///
    /// The store is queried with the pattern's scenario (default scenario if
    /// absent); the generator sees the classification exactly as sent.
    pub fn generate_sar(&self, request: &Value) -> MonitorResult<SarPayload> {
        let body = match request {
            Value::Null => None,
            Value::Object(map) if map.is_empty() => None,
            Value::Object(map) => Some(map),
            _ => {
                return Err(MonitorError::InvalidRequest(
                    "Request body must be a JSON object".into(),
                ))
            }
        }
        .ok_or_else(|| MonitorError::InvalidRequest("No data provided".into()))?;

        let classification: PatternClassification = match body.get("pattern") {
            Some(pattern) => serde_json::from_value(pattern.clone())?,
            None => PatternClassification::default(),
        };

        let config = self.generator.config();
        let query_scenario = classification
            .scenario
            .as_deref()
            .unwrap_or(config.default_scenario());
        let transactions = self.store.report_transactions(
            query_scenario,
            config.query().min_suspicious_score,
            config.query().transaction_limit,
        )?;

        let sar_report = self.generator.generate_report(&classification, &transactions);
        log::info!(
            "SAR {} generated for '{}' from {} transactions",
            sar_report.report_id,
            sar_report.details.pattern_type,
            transactions.len()
        );
        Ok(SarPayload { sar_report })
    }

    pub fn templates(&self) -> TemplatesPayload {
        TemplatesPayload {
            templates: self.generator.config().templates().clone(),
        }
    }

    pub fn hydra_generate(&mut self) -> HydraPatternPayload {
        let pattern = self.hydra.generate_pattern();
        log::info!(
            "HYDRA pattern {} ({}) with {} transactions",
            pattern.pattern_id,
            pattern.pattern_type,
            pattern.transactions.len()
        );
        HydraPatternPayload { pattern }
    }

    /// Score a pattern. Needs at least `pattern_id`; `complexity_score`
    /// defaults to 0.5.
    pub fn hydra_detect(&mut self, pattern: &Value) -> MonitorResult<DetectionPayload> {
        let empty = match pattern {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            return Err(MonitorError::InvalidRequest(
                "No pattern data provided".into(),
            ));
        }
        let request: DetectionRequest = serde_json::from_value(pattern.clone())?;
        Ok(DetectionPayload {
            detection: self.hydra.test_detection(&request),
        })
    }

    pub fn hydra_simulation(&mut self, rounds: usize) -> MonitorResult<SimulationPayload> {
        Ok(SimulationPayload {
            simulation: self.hydra.run_simulation(rounds)?,
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            service: SERVICE_NAME,
        }
    }

    /// Dispatch one request and render its JSON response.
    pub fn handle(&mut self, request: ServiceRequest) -> Value {
        match request {
            ServiceRequest::Timeline { scenario } => {
                render(ApiResponse::from(self.timeline(scenario.as_deref())))
            }
            ServiceRequest::Patterns => render(ApiResponse::from(self.patterns())),
            ServiceRequest::GenerateSar { pattern } => {
                let body = match pattern {
                    Some(p) => serde_json::json!({ "pattern": p }),
                    None => Value::Null,
                };
                render(ApiResponse::from(self.generate_sar(&body)))
            }
            ServiceRequest::Templates => render(ApiResponse::Success(self.templates())),
            ServiceRequest::Health => render(self.health()),
            ServiceRequest::HydraGenerate => render(ApiResponse::Success(self.hydra_generate())),
            ServiceRequest::HydraDetect { pattern } => {
                let pattern = pattern.unwrap_or(Value::Null);
                render(ApiResponse::from(self.hydra_detect(&pattern)))
            }
            ServiceRequest::HydraSimulation { rounds } => {
                render(ApiResponse::from(self.hydra_simulation(rounds)))
            }
        }
    }
}

/// Serialize a response; a payload that cannot be serialized becomes an
/// error envelope itself.
pub fn render<T: Serialize>(response: T) -> Value {
    serde_json::to_value(&response).unwrap_or_else(|e| {
        log::error!("Response serialization failed: {}", e);
        serde_json::json!({ "status": "error", "message": e.to_string() })
    })
}
