//! TriNetra transaction-monitoring backend.
//!
//! Three views over one transaction table: a chronological timeline, per
//! pattern statistics, and Suspicious Activity Report generation. HYDRA
//! runs adversarial generate/detect drills alongside them.

pub mod clock;
pub mod config;
pub mod error;
pub mod hydra;
pub mod pattern_aggregator;
pub mod report_generator;
pub mod rng;
pub mod sar_report;
pub mod service;
pub mod store;
pub mod synthetic;
pub mod timeline;
pub mod transaction;
pub mod types;
