//! System health report over the most recent predictions

use chrono::Utc;
use thiserror::Error;

use crate::config::DriftConfig;
use crate::recommendations::{recommendations, Condition};
use crate::trend::stats::{failure_rate, mean};
use crate::types::{HealthMetrics, HealthReport, HealthStatus, PredictionRecord, Role};

#[derive(Debug, Error)]
enum HealthError {
    #[error("{metric} is not a finite number ({value})")]
    NonFinite { metric: &'static str, value: f64 },
}

/// Build the health report. Failures become an `error` status report.
pub fn report(history: &[PredictionRecord], config: &DriftConfig, role: Role) -> HealthReport {
    if history.is_empty() {
        return HealthReport {
            status: HealthStatus::Unknown,
            summary: vec![
                "No prediction history available. Make some predictions to generate health report."
                    .to_string(),
            ],
            metrics: None,
            timestamp: Utc::now(),
        };
    }

    match build(history, config, role) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Health report generation failed");
            HealthReport {
                status: HealthStatus::Error,
                summary: vec![format!("Error generating health report: {e}")],
                metrics: None,
                timestamp: Utc::now(),
            }
        }
    }
}

fn finite(metric: &'static str, value: f64) -> Result<f64, HealthError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HealthError::NonFinite { metric, value })
    }
}

fn build(
    history: &[PredictionRecord],
    config: &DriftConfig,
    role: Role,
) -> Result<HealthReport, HealthError> {
    let recent = &history[history.len().saturating_sub(config.health_window)..];

    let confidences: Vec<f64> = recent.iter().map(|r| r.class_probability).collect();
    let qualities: Vec<f64> = recent.iter().map(|r| r.data_quality_score).collect();
    let failure_rate = failure_rate(recent);
    let avg_confidence = finite("average confidence", mean(&confidences))?;
    let avg_data_quality = finite("average data quality", mean(&qualities))?;

    let status = if failure_rate > config.health_poor_failure_rate
        || avg_data_quality < config.health_poor_quality
    {
        HealthStatus::Poor
    } else if failure_rate > config.health_fair_failure_rate
        || avg_data_quality < config.health_fair_quality
    {
        HealthStatus::Fair
    } else {
        HealthStatus::Good
    };

    let mut summary = vec![
        format!("System Health Status: {status}"),
        format!("Based on {} recent predictions", recent.len()),
        format!("Failure Rate: {:.1}%", failure_rate * 100.0),
        format!("Average Confidence: {:.1}%", avg_confidence * 100.0),
        format!("Data Quality Score: {avg_data_quality:.1}/100"),
    ];
    summary.push(
        match status {
            HealthStatus::Poor => {
                "⚠️ URGENT: System showing critical issues - Immediate attention required"
            }
            HealthStatus::Fair => {
                "⚠️ CAUTION: System showing early warning signs - Schedule maintenance soon"
            }
            _ => "✅ System operating within normal parameters",
        }
        .to_string(),
    );
    summary.extend(recommendations(&Condition::HealthAction { status }, role));

    Ok(HealthReport {
        status,
        summary,
        metrics: Some(HealthMetrics {
            failure_rate,
            avg_confidence,
            avg_data_quality,
            total_predictions: history.len(),
            recent_predictions: recent.len(),
        }),
        timestamp: Utc::now(),
    })
}
