//! Operational Monitor
//!
//! Keeps a bounded in-memory history of predictions and derives drift,
//! health and rolling failure-rate statistics from it on demand.
//!
//! ## Usage
//!
//! ```ignore
//! let mut monitor = OperationalMonitor::new();
//! monitor.log_prediction(&event);
//! let drift = monitor.detect_concept_drift(Role::MlEngineer);
//! let health = monitor.get_system_health_report(Role::PlantManager);
//! ```
//!
//! The history is independent of the persisted JSON log. Sharing a monitor
//! across threads requires wrapping it in a `Mutex`.

pub mod drift;
pub mod health;

use crate::config::{self, DriftConfig};
use crate::storage::{timestamps, InMemoryLog, PredictionLog};
use crate::trend::stats::{failure_rate, rolling_mean};
use crate::types::{
    now_iso8601, DriftReport, HealthReport, MonitorTrendStatistics, PredictionEvent,
    PredictionRecord, RollingFailurePoint, Role,
};

#[derive(Debug, Clone)]
pub struct OperationalMonitor {
    history: InMemoryLog,
    config: DriftConfig,
    rolling_window: usize,
}

impl Default for OperationalMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationalMonitor {
    /// Monitor using the global `[monitor]` and `[trend]` config
    pub fn new() -> Self {
        let cfg = config::current();
        Self::with_config(cfg.monitor.clone()).with_rolling_window(cfg.trend.rolling_window)
    }

    pub fn with_config(config: DriftConfig) -> Self {
        Self {
            history: InMemoryLog::bounded(config.history_capacity),
            config,
            rolling_window: config::defaults::ROLLING_FAILURE_WINDOW,
        }
    }

    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Normalize and append a loosely-typed prediction event.
    ///
    /// Returns false (and logs a warning) when `prediction`, `probability`
    /// or `sensor_values` is missing, the label is not 0/1, or the
    /// probability vector is empty. A missing timestamp defaults to now and
    /// a missing quality score to 100.
    pub fn log_prediction(&mut self, event: &PredictionEvent) -> bool {
        let (Some(prediction), Some(probability), Some(sensor_values)) = (
            event.prediction,
            event.probability.as_ref(),
            event.sensor_values.as_ref(),
        ) else {
            tracing::warn!("Missing required fields in prediction data");
            return false;
        };

        if prediction > 1 {
            tracing::warn!(prediction, "Prediction label must be 0 or 1");
            return false;
        }

        let Some(class_probability) = probability.to_scalar() else {
            tracing::warn!("Empty probability vector in prediction data");
            return false;
        };

        let record = PredictionRecord {
            timestamp: event.timestamp.clone().unwrap_or_else(now_iso8601),
            predicted_class: prediction,
            class_probability,
            sensor_values: sensor_values.clone(),
            data_quality_score: event.data_quality_score.unwrap_or(100.0),
        };
        self.log_record(record)
    }

    /// Append an already-normalized record
    pub fn log_record(&mut self, record: PredictionRecord) -> bool {
        match self.history.append(record) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to log prediction");
                false
            }
        }
    }

    /// Retained records, oldest first
    pub fn history(&self) -> &[PredictionRecord] {
        self.history.records()
    }

    pub fn detect_concept_drift(&self, role: Role) -> DriftReport {
        drift::detect(self.history.records(), &self.config, role)
    }

    pub fn get_system_health_report(&self, role: Role) -> HealthReport {
        health::report(self.history.records(), &self.config, role)
    }

    /// Totals plus a rolling failure-rate series ordered by timestamp.
    ///
    /// None when the history is empty or its timestamps cannot be parsed.
    pub fn get_trend_statistics(&self) -> Option<MonitorTrendStatistics> {
        let records = self.history.records();
        if records.is_empty() {
            return None;
        }

        let stamps: Vec<&str> = records.iter().map(|r| r.timestamp.as_str()).collect();
        let parsed = match timestamps::parse_column(&stamps) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot compute trend statistics");
                return None;
            }
        };

        let mut ordered: Vec<_> = parsed
            .into_iter()
            .zip(records.iter().map(|r| u8::from(r.is_failure())))
            .collect();
        ordered.sort_by_key(|(ts, _)| *ts);

        let failures: Vec<f64> = ordered.iter().map(|(_, f)| f64::from(*f)).collect();
        let rolling = rolling_mean(&failures, self.rolling_window);
        let trend_data = ordered
            .iter()
            .zip(rolling)
            .map(|((timestamp, failure), rolling_failure_rate)| RollingFailurePoint {
                timestamp: *timestamp,
                failure: *failure,
                rolling_failure_rate,
            })
            .collect();

        let total_failures = records.iter().filter(|r| r.is_failure()).count();
        // Fixed at ten rows whatever the rolling window is
        let recent_start = failures.len().saturating_sub(config::defaults::TREND_RECENT_WINDOW);
        let recent = &failures[recent_start..];
        Some(MonitorTrendStatistics {
            total_predictions: records.len(),
            total_failures,
            overall_failure_rate: failure_rate(records),
            recent_10_failure_rate: recent.iter().sum::<f64>() / recent.len() as f64,
            trend_data,
        })
    }
}
