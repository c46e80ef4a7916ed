//! Inference oracle seam
//!
//! The failure classifier lives outside this crate. Callers load it once and
//! hand it to the diagnostic pipeline as a trait object; nothing here keeps
//! a global model instance.

use thiserror::Error;

use crate::types::{PredictedClass, Prediction, SensorSnapshot};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),
    #[error("Snapshot rejected by model: {0}")]
    InvalidInput(String),
    #[error("Model returned invalid output: {0}")]
    InvalidOutput(String),
}

/// Trait for failure classifiers
///
/// Implementations return both class probabilities and per-feature
/// attributions for one snapshot.
pub trait InferenceOracle {
    /// Backend name for logging
    fn name(&self) -> &str;

    fn predict(&self, snapshot: &SensorSnapshot) -> Result<Prediction, OracleError>;
}

/// Reject predictions whose probabilities are not a distribution
pub fn check_output(prediction: &Prediction) -> Result<(), OracleError> {
    let [p0, p1] = prediction.class_probabilities;
    if !(0.0..=1.0).contains(&p0) || !(0.0..=1.0).contains(&p1) {
        return Err(OracleError::InvalidOutput(format!(
            "class probabilities [{p0}, {p1}] outside [0, 1]"
        )));
    }
    if (p0 + p1 - 1.0).abs() > 1e-6 {
        return Err(OracleError::InvalidOutput(format!(
            "class probabilities [{p0}, {p1}] do not sum to 1"
        )));
    }
    Ok(())
}

/// Oracle that answers with a prediction made elsewhere.
///
/// Used when replaying logged or exported predictions through the
/// pipeline, where the model already ran.
#[derive(Debug, Clone)]
pub struct RecordedOracle {
    prediction: Prediction,
}

impl RecordedOracle {
    pub fn new(prediction: Prediction) -> Self {
        Self { prediction }
    }

    /// Build from a label and the probability of that label.
    ///
    /// Returns None for labels other than 0/1.
    pub fn from_label(label: u8, class_probability: f64) -> Option<Self> {
        let predicted_class = PredictedClass::from_label(label)?;
        let class_probabilities = match predicted_class {
            PredictedClass::Normal => [class_probability, 1.0 - class_probability],
            PredictedClass::Failure => [1.0 - class_probability, class_probability],
        };
        Some(Self::new(Prediction {
            predicted_class,
            class_probabilities,
            attributions: Vec::new(),
        }))
    }
}

impl InferenceOracle for RecordedOracle {
    fn name(&self) -> &str {
        "recorded"
    }

    fn predict(&self, _snapshot: &SensorSnapshot) -> Result<Prediction, OracleError> {
        Ok(self.prediction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_oracle_from_label() {
        let oracle = RecordedOracle::from_label(1, 0.8).unwrap();
        let prediction = oracle.predict(&SensorSnapshot::new()).unwrap();
        assert_eq!(prediction.predicted_class, PredictedClass::Failure);
        assert!((prediction.class_probabilities[0] - 0.2).abs() < 1e-12);
        assert!((prediction.predicted_probability() - 0.8).abs() < 1e-12);
        assert!(check_output(&prediction).is_ok());

        assert!(RecordedOracle::from_label(3, 0.5).is_none());
    }

    #[test]
    fn test_check_output_rejects_bad_distribution() {
        let prediction = Prediction {
            predicted_class: PredictedClass::Normal,
            class_probabilities: [0.7, 0.7],
            attributions: Vec::new(),
        };
        assert!(matches!(
            check_output(&prediction),
            Err(OracleError::InvalidOutput(_))
        ));
    }
}
