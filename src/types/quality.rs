//! Data quality types: AlertStatus, Alert, SensorCheck, QualityReport

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tier shared by alerts, per-sensor checks and the overall report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl AlertStatus {
    pub fn is_normal(&self) -> bool {
        matches!(self, AlertStatus::Normal)
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStatus::Normal => write!(f, "normal"),
            AlertStatus::Warning => write!(f, "warning"),
            AlertStatus::Critical => write!(f, "critical"),
        }
    }
}

/// A single alert with audience-specific recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub status: AlertStatus,
    pub message: String,
    pub recommendations: Vec<String>,
}

/// Stable sort that moves non-normal alerts ahead of normal ones.
///
/// Relative order within each group is preserved.
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by_key(|a| a.status.is_normal());
}

/// Result of validating one sensor reading against its range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorCheck {
    pub status: AlertStatus,
    pub message: String,
    /// 100 normal, 70 warning, 30 critical
    pub score: u8,
    pub recommendations: Vec<String>,
}

/// The four weighted components of the composite score (each 0-100)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComponentScores {
    pub range_compliance: f64,
    pub cross_correlation: f64,
    pub completeness: f64,
    pub signal_stability: f64,
}

impl Default for ComponentScores {
    fn default() -> Self {
        Self {
            range_compliance: 100.0,
            cross_correlation: 100.0,
            completeness: 100.0,
            signal_stability: 100.0,
        }
    }
}

/// Raw violation counts behind the component scores
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityDetails {
    pub range_violations: usize,
    pub critical_violations: usize,
    pub correlation_violations: usize,
    /// Analog sensors absent from the snapshot, in table order
    pub missing_sensors: Vec<String>,
    pub extreme_values: usize,
}

/// Output of the composite scoring pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityScore {
    pub overall_score: f64,
    pub component_scores: ComponentScores,
    pub details: QualityDetails,
}

/// Explanation for a component that scored below 100
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityFactor {
    pub sensor: String,
    pub score: f64,
    pub reason: String,
}

/// Full data-quality assessment for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub overall_status: AlertStatus,
    pub overall_score: f64,
    pub component_scores: ComponentScores,
    pub quality_factors: Vec<QualityFactor>,
    pub alerts: Vec<Alert>,
    pub details: QualityDetails,
    pub timestamp: DateTime<Utc>,
}

impl QualityReport {
    /// True when any alert is critical
    pub fn has_critical_alert(&self) -> bool {
        self.alerts.iter().any(|a| a.status == AlertStatus::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(status: AlertStatus, message: &str) -> Alert {
        Alert {
            status,
            message: message.to_string(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_sort_alerts_moves_normal_last_and_keeps_order() {
        let mut alerts = vec![
            alert(AlertStatus::Normal, "a"),
            alert(AlertStatus::Warning, "b"),
            alert(AlertStatus::Normal, "c"),
            alert(AlertStatus::Critical, "d"),
        ];
        sort_alerts(&mut alerts);
        let order: Vec<&str> = alerts.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }
}
