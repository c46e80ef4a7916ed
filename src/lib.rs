//! APU Monitor: Air Production Unit predictive-maintenance core
//!
//! Scores sensor snapshots for data quality, tracks prediction history for
//! concept drift and system health, and replays the persisted log for
//! trend analysis. All explanations are phrased for a requesting role.
//!
//! ## Components
//!
//! - **SensorValidator**: range checks, cross-sensor rules, composite quality score
//! - **OperationalMonitor**: bounded in-memory history, drift and health reports
//! - **TrendAnalyzer**: windowed replay of the persisted log
//! - **DiagnosticPipeline**: validator → oracle → monitor → persisted log

pub mod config;
pub mod monitor;
pub mod oracle;
pub mod pipeline;
pub mod quality;
pub mod recommendations;
pub mod sensors;
pub mod storage;
pub mod trend;
pub mod types;

// Re-export configuration
pub use config::MonitorConfig;

// Re-export components
pub use monitor::OperationalMonitor;
pub use oracle::{InferenceOracle, OracleError, RecordedOracle};
pub use pipeline::{Diagnosis, DiagnosticPipeline};
pub use quality::SensorValidator;
pub use trend::{TimeAnalysis, TrendAnalyzer, TrendError, TrendQuery};

// Re-export storage
pub use storage::{InMemoryLog, JsonPredictionStore, PredictionLog, StorageError};

// Re-export commonly used types
pub use types::{
    Alert, AlertStatus, DriftReport, HealthReport, HealthStatus, PredictedClass, Prediction,
    PredictionEvent, PredictionRecord, QualityReport, Role, SensorSnapshot, TrendOutcome,
    TrendReport,
};
