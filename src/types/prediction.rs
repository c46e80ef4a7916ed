//! Prediction types: PredictionRecord, PredictionEvent, oracle output

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sensor name to reading. Ordered so every computation over a snapshot is
/// independent of insertion order.
pub type SensorSnapshot = BTreeMap<String, f64>;

/// Failure probability at which a NORMAL prediction is flagged as trending
/// toward failure
pub const EARLY_WARNING_FAILURE_PROBABILITY: f64 = 0.40;

/// Model output class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictedClass {
    Normal,
    Failure,
}

impl PredictedClass {
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(PredictedClass::Normal),
            1 => Some(PredictedClass::Failure),
            _ => None,
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            PredictedClass::Normal => 0,
            PredictedClass::Failure => 1,
        }
    }
}

impl std::fmt::Display for PredictedClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictedClass::Normal => write!(f, "NORMAL"),
            PredictedClass::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Signed contribution of one feature toward the model output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribution {
    pub feature: String,
    pub contribution: f64,
    pub value: f64,
}

/// Output of the inference oracle for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub predicted_class: PredictedClass,
    /// `[p_normal, p_failure]`
    pub class_probabilities: [f64; 2],
    pub attributions: Vec<Attribution>,
}

impl Prediction {
    /// Probability of the class that was predicted
    pub fn predicted_probability(&self) -> f64 {
        self.class_probabilities[usize::from(self.predicted_class.label())]
    }

    pub fn failure_probability(&self) -> f64 {
        self.class_probabilities[1]
    }

    /// NORMAL prediction whose failure probability is already high
    pub fn is_early_warning(&self) -> bool {
        self.predicted_class == PredictedClass::Normal
            && self.failure_probability() >= EARLY_WARNING_FAILURE_PROBABILITY
    }

    /// The `n` attributions with the largest absolute contribution, strongest first
    pub fn top_attributions(&self, n: usize) -> Vec<&Attribution> {
        let mut ranked: Vec<&Attribution> = self.attributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }
}

/// One completed inference + scoring cycle.
///
/// This is the unit of both the in-memory monitor history and the persisted
/// log. Legacy logs use `prediction` / `probability` as field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    /// ISO-8601 when produced by this crate; older logs may use other formats
    pub timestamp: String,
    #[serde(alias = "prediction")]
    pub predicted_class: u8,
    /// Probability of the predicted class
    #[serde(alias = "probability")]
    pub class_probability: f64,
    pub sensor_values: SensorSnapshot,
    #[serde(default = "default_quality_score")]
    pub data_quality_score: f64,
}

fn default_quality_score() -> f64 {
    100.0
}

impl PredictionRecord {
    /// Build a record stamped with the current time
    pub fn now(
        predicted_class: PredictedClass,
        class_probability: f64,
        sensor_values: SensorSnapshot,
        data_quality_score: f64,
    ) -> Self {
        Self {
            timestamp: now_iso8601(),
            predicted_class: predicted_class.label(),
            class_probability,
            sensor_values,
            data_quality_score,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.predicted_class == 1
    }
}

/// Probability as supplied by callers: a scalar or a per-class vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProbabilityInput {
    Scalar(f64),
    PerClass(Vec<f64>),
}

impl ProbabilityInput {
    /// Collapse to a scalar. Per-class vectors yield their first entry.
    pub fn to_scalar(&self) -> Option<f64> {
        match self {
            ProbabilityInput::Scalar(p) => Some(*p),
            ProbabilityInput::PerClass(values) => values.first().copied(),
        }
    }
}

/// Loosely-typed prediction payload accepted by the operational monitor.
///
/// Every field is optional so that missing keys are detected by the monitor
/// instead of failing at deserialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub prediction: Option<u8>,
    #[serde(default)]
    pub probability: Option<ProbabilityInput>,
    #[serde(default)]
    pub sensor_values: Option<SensorSnapshot>,
    #[serde(default)]
    pub data_quality_score: Option<f64>,
}

impl From<&PredictionRecord> for PredictionEvent {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            timestamp: Some(record.timestamp.clone()),
            prediction: Some(record.predicted_class),
            probability: Some(ProbabilityInput::Scalar(record.class_probability)),
            sensor_values: Some(record.sensor_values.clone()),
            data_quality_score: Some(record.data_quality_score),
        }
    }
}

/// Current local wall-clock time as an ISO-8601 string (no offset,
/// microsecond precision). Trend date and time-of-day windows group records
/// by this local time.
pub fn now_iso8601() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribution(feature: &str, contribution: f64) -> Attribution {
        Attribution {
            feature: feature.to_string(),
            contribution,
            value: 1.0,
        }
    }

    #[test]
    fn test_top_attributions_ranked_by_magnitude() {
        let prediction = Prediction {
            predicted_class: PredictedClass::Failure,
            class_probabilities: [0.2, 0.8],
            attributions: vec![
                attribution("TP2", 0.1),
                attribution("Oil_level", -0.9),
                attribution("H1", 0.5),
            ],
        };
        let top: Vec<&str> = prediction
            .top_attributions(2)
            .iter()
            .map(|a| a.feature.as_str())
            .collect();
        assert_eq!(top, vec!["Oil_level", "H1"]);
        assert!((prediction.predicted_probability() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_early_warning_on_risky_normal() {
        let prediction = Prediction {
            predicted_class: PredictedClass::Normal,
            class_probabilities: [0.55, 0.45],
            attributions: Vec::new(),
        };
        assert!(prediction.is_early_warning());
    }

    #[test]
    fn test_record_accepts_legacy_field_names() {
        let json = r#"{
            "timestamp": "2024-03-01T10:00:00",
            "prediction": 1,
            "probability": 0.93,
            "sensor_values": {"TP2": 8.0}
        }"#;
        let record: PredictionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.predicted_class, 1);
        assert!((record.class_probability - 0.93).abs() < 1e-12);
        assert!((record.data_quality_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_probability_vector_takes_first_entry() {
        let event: PredictionEvent =
            serde_json::from_str(r#"{"probability": [0.7, 0.3]}"#).unwrap();
        assert_eq!(event.probability.and_then(|p| p.to_scalar()), Some(0.7));
    }

    #[test]
    fn test_record_stamped_in_local_time() {
        let before = Local::now().naive_local() - chrono::Duration::seconds(1);
        let record = PredictionRecord::now(PredictedClass::Normal, 0.9, SensorSnapshot::new(), 100.0);
        let stamped =
            chrono::NaiveDateTime::parse_from_str(&record.timestamp, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        assert!(stamped >= before);
        assert!(stamped <= Local::now().naive_local());
    }

    #[test]
    fn test_record_converts_back_to_event() {
        let mut sensor_values = SensorSnapshot::new();
        sensor_values.insert("TP3".to_string(), 9.0);
        let record = PredictionRecord {
            timestamp: "2024-03-01T10:00:00".to_string(),
            predicted_class: 1,
            class_probability: 0.64,
            sensor_values: sensor_values.clone(),
            data_quality_score: 88.0,
        };
        let event = PredictionEvent::from(&record);
        assert_eq!(event.timestamp.as_deref(), Some("2024-03-01T10:00:00"));
        assert_eq!(event.prediction, Some(1));
        assert_eq!(event.probability.and_then(|p| p.to_scalar()), Some(0.64));
        assert_eq!(event.sensor_values, Some(sensor_values));
        assert_eq!(event.data_quality_score, Some(88.0));
    }
}
