//! Diagnostic pipeline for one sensor snapshot
//!
//! validator → oracle → operational monitor → persisted log
//!
//! The pipeline owns the validator, the monitor and (optionally) a
//! persisted log. The oracle is passed in per call so one loaded model can
//! serve any number of pipelines. Persistence failures are logged and do
//! not fail the diagnosis.

use serde::Serialize;

use crate::monitor::OperationalMonitor;
use crate::oracle::{check_output, InferenceOracle, OracleError};
use crate::quality::SensorValidator;
use crate::storage::PredictionLog;
use crate::types::{Prediction, PredictionRecord, QualityReport, Role, SensorSnapshot};

/// Everything produced for one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub quality: QualityReport,
    pub prediction: Prediction,
    pub record: PredictionRecord,
    /// False when the persisted log rejected the record (or none is attached)
    pub persisted: bool,
}

pub struct DiagnosticPipeline {
    validator: SensorValidator,
    monitor: OperationalMonitor,
    store: Option<Box<dyn PredictionLog>>,
}

impl DiagnosticPipeline {
    pub fn new(validator: SensorValidator, monitor: OperationalMonitor) -> Self {
        Self {
            validator,
            monitor,
            store: None,
        }
    }

    /// Attach a persisted log that every diagnosis is appended to
    pub fn with_store(mut self, store: Box<dyn PredictionLog>) -> Self {
        tracing::info!(backend = store.backend_name(), records = store.len(), "Persisted log attached");
        self.store = Some(store);
        self
    }

    pub fn monitor(&self) -> &OperationalMonitor {
        &self.monitor
    }

    pub fn store(&self) -> Option<&dyn PredictionLog> {
        self.store.as_deref()
    }

    /// Score, classify, and log one snapshot stamped with the current time
    pub fn diagnose(
        &mut self,
        oracle: &dyn InferenceOracle,
        snapshot: &SensorSnapshot,
        role: Role,
    ) -> Result<Diagnosis, OracleError> {
        self.diagnose_at(oracle, snapshot, None, role)
    }

    /// Same as [`diagnose`](Self::diagnose) with an explicit record timestamp
    pub fn diagnose_at(
        &mut self,
        oracle: &dyn InferenceOracle,
        snapshot: &SensorSnapshot,
        timestamp: Option<&str>,
        role: Role,
    ) -> Result<Diagnosis, OracleError> {
        let quality = self.validator.generate_data_quality_report(snapshot, role);

        let prediction = oracle.predict(snapshot)?;
        check_output(&prediction)?;

        let mut record = PredictionRecord::now(
            prediction.predicted_class,
            prediction.predicted_probability(),
            snapshot.clone(),
            quality.overall_score,
        );
        if let Some(ts) = timestamp {
            record.timestamp = ts.to_string();
        }

        if prediction.is_early_warning() {
            tracing::warn!(
                failure_probability = prediction.failure_probability(),
                "NORMAL prediction trending toward failure"
            );
        }

        self.monitor.log_record(record.clone());

        let persisted = match self.store.as_mut() {
            Some(store) => match store.append(record.clone()) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(
                        backend = store.backend_name(),
                        error = %e,
                        "Failed to persist prediction, continuing"
                    );
                    false
                }
            },
            None => false,
        };

        tracing::debug!(
            oracle = oracle.name(),
            class = %prediction.predicted_class,
            quality = quality.overall_score,
            persisted,
            "Snapshot diagnosed"
        );

        Ok(Diagnosis {
            quality,
            prediction,
            record,
            persisted,
        })
    }
}
