//! HYDRA: adversarial pattern generation and detection drills.
//!
//! The generator fabricates laundering-shaped transaction bursts; the
//! detector scores them against a fixed base accuracy, penalised by the
//! pattern's complexity. Both draw from the dedicated adversarial stream,
//! so a seed reproduces a whole simulation.

use crate::{
    clock::{Clock, SystemClock},
    error::{MonitorError, MonitorResult},
    rng::{ScenarioRng, ScenarioSlot},
    types::AccountId,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const GENERATION_PATTERNS: [&str; 4] = [
    "smurfing_enhanced",
    "layering_complex",
    "integration_hidden",
    "shell_company_web_v2",
];

const BASE_DETECTION_ACCURACY: f64 = 0.75;
const COMPLEXITY_PENALTY: f64 = 0.2;
const DETECTION_NOISE: f64 = 0.1;
const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;
const DETECTION_THRESHOLD: f64 = 0.5;

const COMPLEXITY_RANGE: (f64, f64) = (0.6, 0.9);
const AMOUNT_RANGE: (f64, f64) = (1000.0, 10000.0);
const MIN_BURST: u64 = 10;
const MAX_BURST: u64 = 30;

pub const DEFAULT_SIMULATION_ROUNDS: usize = 10;
const DEFAULT_COMPLEXITY: f64 = 0.5;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTransaction {
    #[serde(rename = "from")]
    pub from_account: AccountId,
    #[serde(rename = "to")]
    pub to_account: AccountId,
    pub amount: f64,
    pub timestamp: String,
    pub generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversarialPattern {
    pub pattern_id: String,
    pub pattern_type: String,
    pub complexity_score: f64,
    pub transactions: Vec<GeneratedTransaction>,
    pub generated_at: NaiveDateTime,
}

/// What the detector needs to know about a pattern. Any other keys are
/// ignored, so a full [`AdversarialPattern`] is accepted as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionRequest {
    pub pattern_id: String,
    #[serde(default = "default_complexity")]
    pub complexity_score: f64,
}

fn default_complexity() -> f64 {
    DEFAULT_COMPLEXITY
}

impl From<&AdversarialPattern> for DetectionRequest {
    fn from(p: &AdversarialPattern) -> Self {
        Self {
            pattern_id: p.pattern_id.clone(),
            complexity_score: p.complexity_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detected: bool,
    /// Clamped to [0.1, 0.95].
    pub confidence: f64,
    pub pattern_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRound {
    pub round: usize,
    pub pattern: String,
    pub complexity: f64,
    pub detected: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub rounds: usize,
    pub total_detected: usize,
    pub detection_rate: f64,
    pub results: Vec<SimulationRound>,
}

pub struct HydraEngine {
    rng: ScenarioRng,
    clock: Box<dyn Clock>,
}

impl HydraEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, Box::new(SystemClock))
    }

    pub fn with_clock(seed: u64, clock: Box<dyn Clock>) -> Self {
        Self {
            rng: ScenarioSlot::Adversarial.rng(seed),
            clock,
        }
    }

    /// `GEN_<HHMMSS>` with a burst of 10 to 30 transactions.
    pub fn generate_pattern(&mut self) -> AdversarialPattern {
        let now = self.clock.now();
        let idx = self.rng.next_u64_below(GENERATION_PATTERNS.len() as u64) as usize;
        let pattern_type = GENERATION_PATTERNS[idx];
        let complexity_score = self.rng.uniform(COMPLEXITY_RANGE.0, COMPLEXITY_RANGE.1);

        let burst = MIN_BURST + self.rng.next_u64_below(MAX_BURST - MIN_BURST + 1);
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let transactions = (0..burst as usize)
            .map(|i| GeneratedTransaction {
                from_account: format!("GEN_ACC_{:02}", i % 5),
                to_account: format!("TARGET_{:02}", i % 3),
                amount: self.rng.uniform(AMOUNT_RANGE.0, AMOUNT_RANGE.1),
                timestamp: timestamp.clone(),
                generated: true,
            })
            .collect();

        AdversarialPattern {
            pattern_id: format!("GEN_{}", now.format("%H%M%S")),
            pattern_type: pattern_type.to_string(),
            complexity_score,
            transactions,
            generated_at: now,
        }
    }

    pub fn test_detection(&mut self, request: &DetectionRequest) -> DetectionResult {
        let noise = self.rng.uniform(-DETECTION_NOISE, DETECTION_NOISE);
        let confidence = (BASE_DETECTION_ACCURACY - request.complexity_score * COMPLEXITY_PENALTY
            + noise)
            .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
        DetectionResult {
            detected: confidence > DETECTION_THRESHOLD,
            confidence,
            pattern_id: request.pattern_id.clone(),
        }
    }

    /// Generate-then-detect, `rounds` times.
    pub fn run_simulation(&mut self, rounds: usize) -> MonitorResult<SimulationSummary> {
        if rounds == 0 {
            return Err(MonitorError::InvalidRequest(
                "Simulation needs at least one round".into(),
            ));
        }

        let mut results = Vec::with_capacity(rounds);
        for round in 1..=rounds {
            let pattern = self.generate_pattern();
            let detection = self.test_detection(&DetectionRequest::from(&pattern));
            results.push(SimulationRound {
                round,
                pattern: pattern.pattern_type,
                complexity: pattern.complexity_score,
                detected: detection.detected,
                confidence: detection.confidence,
            });
        }

        let total_detected = results.iter().filter(|r| r.detected).count();
        log::info!(
            "HYDRA simulation: {}/{} patterns detected",
            total_detected,
            rounds
        );
        Ok(SimulationSummary {
            rounds,
            total_detected,
            detection_rate: total_detected as f64 / rounds as f64,
            results,
        })
    }
}
