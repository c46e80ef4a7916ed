//! Report types produced on demand from prediction history

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AlertStatus;

// ============================================================================
// Drift
// ============================================================================

/// Rolling-window statistics behind a drift evaluation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftMetrics {
    pub recent_failure_rate: f64,
    /// Absent when fewer than two full windows are available
    pub older_failure_rate: Option<f64>,
    pub avg_confidence: f64,
    pub avg_data_quality: f64,
}

/// Concept-drift assessment over the in-memory history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub drift_detected: bool,
    pub severity: AlertStatus,
    /// None when there was not enough history to evaluate
    pub metrics: Option<DriftMetrics>,
    pub messages: Vec<String>,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl DriftReport {
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self {
            drift_detected: false,
            severity: AlertStatus::Normal,
            metrics: None,
            messages: vec![message.into()],
            recommendations: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.metrics.is_none()
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Good,
    Fair,
    Poor,
    /// No history yet
    Unknown,
    /// Report generation failed; see summary
    Error,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Good => write!(f, "GOOD"),
            HealthStatus::Fair => write!(f, "FAIR"),
            HealthStatus::Poor => write!(f, "POOR"),
            HealthStatus::Unknown => write!(f, "UNKNOWN"),
            HealthStatus::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthMetrics {
    pub failure_rate: f64,
    pub avg_confidence: f64,
    pub avg_data_quality: f64,
    pub total_predictions: usize,
    pub recent_predictions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub summary: Vec<String>,
    pub metrics: Option<HealthMetrics>,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Rolling failure rate (shared by monitor statistics and trend reports)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollingFailurePoint {
    pub timestamp: NaiveDateTime,
    pub failure: u8,
    pub rolling_failure_rate: f64,
}

/// Summary statistics over the monitor's in-memory history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorTrendStatistics {
    pub total_predictions: usize,
    pub total_failures: usize,
    pub overall_failure_rate: f64,
    pub recent_10_failure_rate: f64,
    pub trend_data: Vec<RollingFailurePoint>,
}

// ============================================================================
// Trend
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Deteriorating,
    Improving,
}

/// Descriptive statistics for one sensor parameter over the filtered window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterAnalysis {
    pub parameter: String,
    /// Last observation; None when the newest record lacks the sensor
    pub current_value: Option<f64>,
    pub mean: f64,
    /// Sample standard deviation (NaN with fewer than two observations)
    pub std: f64,
    pub max: f64,
    pub min: f64,
    pub unit: String,
    pub description: String,
}

/// Per-parameter findings plus audience-specific recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailedTrendAnalysis {
    pub summary: Vec<String>,
    pub recommendations: Vec<String>,
    pub critical_issues: Vec<String>,
    pub parameters: Vec<ParameterAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

/// Time-indexed series for one parameter with static reference lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSeries {
    pub parameter: String,
    pub points: Vec<SeriesPoint>,
    pub critical_high: Option<f64>,
    pub critical_low: Option<f64>,
}

/// Pearson correlation matrix; cells are None when undefined
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorrelationMatrix {
    pub parameters: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    /// Two-tailed p-value of each coefficient (Student's t, n-2 dof)
    pub p_values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.parameters.iter().position(|p| p == a)?;
        let j = self.parameters.iter().position(|p| p == b)?;
        self.values.get(i)?.get(j).copied().flatten()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub total_predictions: usize,
    pub failure_count: usize,
    pub failure_rate: f64,
    pub trend_direction: TrendDirection,
    pub parameter_series: Vec<ParameterSeries>,
    pub correlation: CorrelationMatrix,
    pub rolling_failure_rate: Vec<RollingFailurePoint>,
    pub role_specific_insights: Vec<String>,
    pub detailed_analysis: DetailedTrendAnalysis,
}

/// Trend analysis result. An empty window is a sentinel, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    NoData,
    Success(Box<TrendReport>),
}

impl TrendOutcome {
    pub fn report(&self) -> Option<&TrendReport> {
        match self {
            TrendOutcome::NoData => None,
            TrendOutcome::Success(report) => Some(report),
        }
    }
}
