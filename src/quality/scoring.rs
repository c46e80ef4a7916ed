//! Composite data-quality score (0-100)
//!
//! Weighted sum of four components, each 0-100:
//! - 40% range compliance (critical readings dominate warnings, no compounding)
//! - 30% cross-sensor consistency
//! - 20% completeness of the analog set
//! - 10% signal stability (extreme high readings)
//!
//! Only analog sensors count toward range, completeness and stability.

use crate::config::ValidationConfig;
use crate::recommendations::Condition;
use crate::sensors::{self, SensorRange};
use crate::types::{AlertStatus, ComponentScores, QualityDetails, QualityScore, SensorSnapshot};

use super::correlation;

/// Where a reading falls relative to its range entry.
///
/// The critical band is checked first, so a reading that is both above
/// `critical_high` and inside the normal band is critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeClass {
    CriticalLow,
    CriticalHigh,
    WarningLow,
    WarningHigh,
    Normal,
}

impl RangeClass {
    pub fn classify(range: &SensorRange, value: f64) -> Self {
        if value < range.critical_low {
            RangeClass::CriticalLow
        } else if value > range.critical_high {
            RangeClass::CriticalHigh
        } else if value < range.normal_min {
            RangeClass::WarningLow
        } else if value > range.normal_max {
            RangeClass::WarningHigh
        } else {
            RangeClass::Normal
        }
    }

    pub fn status(&self) -> AlertStatus {
        match self {
            RangeClass::CriticalLow | RangeClass::CriticalHigh => AlertStatus::Critical,
            RangeClass::WarningLow | RangeClass::WarningHigh => AlertStatus::Warning,
            RangeClass::Normal => AlertStatus::Normal,
        }
    }

    pub fn condition<'a>(&self, sensor: &'a str) -> Option<Condition<'a>> {
        match self {
            RangeClass::CriticalLow => Some(Condition::CriticalLow { sensor }),
            RangeClass::CriticalHigh => Some(Condition::CriticalHigh { sensor }),
            RangeClass::WarningLow => Some(Condition::WarningLow { sensor }),
            RangeClass::WarningHigh => Some(Condition::WarningHigh { sensor }),
            RangeClass::Normal => None,
        }
    }
}

/// Analog readings present in the snapshot, paired with their range entry
pub(crate) fn analog_readings(
    snapshot: &SensorSnapshot,
) -> impl Iterator<Item = (&'static SensorRange, f64)> + '_ {
    snapshot
        .iter()
        .filter_map(|(name, &value)| sensors::range(name).map(|r| (r, value)))
}

fn range_compliance(critical: usize, warnings: usize) -> f64 {
    if critical > 0 {
        (100.0 - 40.0 * critical as f64).max(0.0)
    } else if warnings > 0 {
        (100.0 - 20.0 * warnings as f64).max(60.0)
    } else {
        100.0
    }
}

/// Compute the composite score for one snapshot.
pub fn score(snapshot: &SensorSnapshot, config: &ValidationConfig) -> QualityScore {
    let mut details = QualityDetails::default();

    for (range, value) in analog_readings(snapshot) {
        match RangeClass::classify(range, value).status() {
            AlertStatus::Critical => details.critical_violations += 1,
            AlertStatus::Warning => details.range_violations += 1,
            AlertStatus::Normal => {}
        }

        // Upper band only; readings far below normal are caught by range compliance
        if value > range.normal_max + range.normal_span() * config.stability_band_factor {
            details.extreme_values += 1;
        }
    }

    details.correlation_violations = correlation::evaluate(snapshot, config)
        .iter()
        .filter(|f| f.is_scored())
        .count();

    details.missing_sensors = sensors::analog_names()
        .filter(|name| !snapshot.contains_key(*name))
        .map(String::from)
        .collect();

    let analog_total = sensors::ANALOG_SENSORS.len() as f64;
    let components = ComponentScores {
        range_compliance: range_compliance(details.critical_violations, details.range_violations),
        cross_correlation: (100.0 - 25.0 * details.correlation_violations as f64).max(0.0),
        completeness: (100.0 * (1.0 - details.missing_sensors.len() as f64 / analog_total)).max(0.0),
        signal_stability: (100.0 - 20.0 * details.extreme_values as f64).max(0.0),
    };

    let overall_score = components.range_compliance * config.weight_range_compliance
        + components.cross_correlation * config.weight_cross_correlation
        + components.completeness * config.weight_completeness
        + components.signal_stability * config.weight_signal_stability;

    tracing::debug!(
        overall = overall_score,
        range = components.range_compliance,
        correlation = components.cross_correlation,
        completeness = components.completeness,
        stability = components.signal_stability,
        "Computed data quality score"
    );

    QualityScore {
        overall_score,
        component_scores: components,
        details,
    }
}
