//! Shared primitive types and scenario keys.

/// A transaction identifier as stored in the dataset.
pub type TransactionId = String;

/// An account identifier (from/to side of a transaction).
pub type AccountId = String;

/// Categorical scenario label keying templates, indicators and recommendations.
pub type ScenarioKey = String;

pub const TERRORIST_FINANCING: &str = "terrorist_financing";
pub const CRYPTO_SANCTIONS: &str = "crypto_sanctions";
pub const HUMAN_TRAFFICKING: &str = "human_trafficking";
pub const BASELINE: &str = "baseline";

/// Scenario used by a classification that carries no scenario at all.
pub const UNKNOWN_SCENARIO: &str = "unknown";

/// Timeline filter sentinel that selects every scenario.
pub const ALL_SCENARIOS: &str = "all";
