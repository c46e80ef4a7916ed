//! Concept-drift detection over the in-memory prediction history
//!
//! Compares the failure rate of the most recent window with the window
//! before it, and checks the recent window's confidence and data quality.
//! Checks run in a fixed order (rate, confidence, quality) and their
//! messages and recommendations concatenate in that order.

use chrono::Utc;

use crate::config::DriftConfig;
use crate::recommendations::{recommendations, Condition};
use crate::trend::stats::{failure_rate, mean};
use crate::types::{AlertStatus, DriftMetrics, DriftReport, PredictionRecord, Role};

pub fn detect(history: &[PredictionRecord], config: &DriftConfig, role: Role) -> DriftReport {
    let window = config.drift_window;
    if history.len() < window || window == 0 {
        return DriftReport::insufficient_data(format!(
            "Insufficient data for drift detection (need at least {window} predictions)"
        ));
    }

    let recent = &history[history.len() - window..];
    let older = (history.len() >= 2 * window)
        .then(|| &history[history.len() - 2 * window..history.len() - window]);

    let recent_failure_rate = failure_rate(recent);
    let confidences: Vec<f64> = recent.iter().map(|r| r.class_probability).collect();
    let qualities: Vec<f64> = recent.iter().map(|r| r.data_quality_score).collect();
    let metrics = DriftMetrics {
        recent_failure_rate,
        older_failure_rate: older.map(failure_rate),
        avg_confidence: mean(&confidences),
        avg_data_quality: mean(&qualities),
    };

    let mut drift_detected = false;
    let mut severity = AlertStatus::Normal;
    let mut messages = Vec::new();
    let mut recs = Vec::new();

    if let Some(older_rate) = metrics.older_failure_rate {
        let rate_change = (recent_failure_rate - older_rate).abs();
        if rate_change > config.rate_warning_delta {
            drift_detected = true;
            severity = if rate_change > config.rate_critical_delta {
                AlertStatus::Critical
            } else {
                AlertStatus::Warning
            };
            let change_pct = rate_change * 100.0;
            messages.push(format!(
                "Significant shift in failure prediction rate detected: {change_pct:.1}% change"
            ));
            recs.extend(recommendations(
                &Condition::FailureRateShift {
                    change_pct,
                    increasing: recent_failure_rate > older_rate,
                },
                role,
            ));
        }
    }

    if metrics.avg_confidence < config.min_confidence {
        messages.push(format!(
            "Low prediction confidence detected (avg: {:.1}%)",
            metrics.avg_confidence * 100.0
        ));
        recs.extend(recommendations(&Condition::LowConfidence, role));
    }

    if metrics.avg_data_quality < config.min_quality {
        drift_detected = true;
        messages.push(format!(
            "Data quality degradation detected (avg score: {:.1}/100)",
            metrics.avg_data_quality
        ));
        recs.extend(recommendations(&Condition::QualityDegradation, role));
    }

    tracing::debug!(
        drift_detected,
        severity = %severity,
        recent_failure_rate,
        older_failure_rate = ?metrics.older_failure_rate,
        "Drift evaluation complete"
    );

    DriftReport {
        drift_detected,
        severity,
        metrics: Some(metrics),
        messages,
        recommendations: recs,
        timestamp: Utc::now(),
    }
}
