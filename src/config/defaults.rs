//! System-wide default constants.
//!
//! Every tunable in `MonitorConfig` defaults to one of these values.

// ============================================================================
// Sensor Validation
// ============================================================================

/// Composite score weights (range, correlation, completeness, stability).
pub const WEIGHT_RANGE_COMPLIANCE: f64 = 0.40;
pub const WEIGHT_CROSS_CORRELATION: f64 = 0.30;
pub const WEIGHT_COMPLETENESS: f64 = 0.20;
pub const WEIGHT_SIGNAL_STABILITY: f64 = 0.10;

/// Maximum TP3 / Reservoirs disagreement before a mismatch is raised (bar).
pub const PRESSURE_MATCH_TOLERANCE_BAR: f64 = 0.5;

/// Motor current above which the outlet valve is expected open (A).
pub const MOTOR_CURRENT_HIGH_AMPS: f64 = 6.0;

/// Fraction of the normal span above `normal_max` that counts as an outlier.
pub const STABILITY_BAND_FACTOR: f64 = 0.5;

/// Overall score below this is `critical`.
pub const QUALITY_CRITICAL_BELOW: f64 = 60.0;

/// Overall score below this is `warning`.
pub const QUALITY_WARNING_BELOW: f64 = 80.0;

// ============================================================================
// Operational Monitor
// ============================================================================

/// In-memory prediction history capacity (FIFO eviction).
pub const HISTORY_CAPACITY: usize = 1_000;

/// Size of each drift comparison window. Drift needs at least one full window.
pub const DRIFT_WINDOW: usize = 50;

/// Failure-rate shift that flags drift.
pub const DRIFT_RATE_WARNING_DELTA: f64 = 0.30;

/// Failure-rate shift that escalates drift to critical.
pub const DRIFT_RATE_CRITICAL_DELTA: f64 = 0.50;

/// Average recent confidence below this raises a low-confidence message.
pub const DRIFT_MIN_CONFIDENCE: f64 = 0.70;

/// Average recent data quality below this flags quality drift.
pub const DRIFT_MIN_QUALITY: f64 = 80.0;

/// Number of most recent records used for the health report.
pub const HEALTH_WINDOW: usize = 100;

pub const HEALTH_POOR_FAILURE_RATE: f64 = 0.30;
pub const HEALTH_POOR_QUALITY: f64 = 70.0;
pub const HEALTH_FAIR_FAILURE_RATE: f64 = 0.10;
pub const HEALTH_FAIR_QUALITY: f64 = 85.0;

// ============================================================================
// Trend Analysis
// ============================================================================

/// Head/tail window for the deteriorating/improving comparison.
pub const TREND_DIRECTION_WINDOW: usize = 50;

/// Tail window for the reliability and percent-change insights.
pub const TREND_RECENT_WINDOW: usize = 10;

/// Relative change of the recent mean that is worth reporting (%).
pub const TREND_PERCENT_CHANGE: f64 = 10.0;

/// Standard deviations from the mean that count as a deviation.
pub const TREND_DEVIATION_SIGMA: f64 = 2.0;

/// `current > factor × critical_high` is approaching the high limit.
pub const TREND_APPROACH_HIGH_FACTOR: f64 = 0.9;

/// `current < factor × critical_low` is approaching the low limit.
pub const TREND_APPROACH_LOW_FACTOR: f64 = 1.1;

/// Window for the rolling failure-rate series.
pub const ROLLING_FAILURE_WINDOW: usize = 10;

// ============================================================================
// Storage
// ============================================================================

/// Default persisted prediction log.
pub const HISTORY_FILE: &str = "apu_prediction_history.json";
