//! Sensor Validation Module
//!
//! Per-reading range checks, cross-sensor consistency rules and the
//! composite data-quality score, each annotated with recommendations for
//! the requesting role.
//!
//! `SensorValidator` holds no mutable state; every call is a pure function
//! of the snapshot, the role and the validation config.

pub mod correlation;
pub mod scoring;

use chrono::Utc;

use crate::config::{self, ValidationConfig};
use crate::recommendations::recommendations;
use crate::sensors::{self, format_limit};
use crate::types::{
    sort_alerts, Alert, AlertStatus, QualityFactor, QualityReport, QualityScore, Role,
    SensorCheck, SensorSnapshot,
};

pub use correlation::CorrelationFinding;
pub use scoring::RangeClass;

#[derive(Debug, Clone)]
pub struct SensorValidator {
    config: ValidationConfig,
}

impl Default for SensorValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorValidator {
    /// Validator using the global `[validation]` config (defaults before init)
    pub fn new() -> Self {
        Self::with_config(config::current().validation.clone())
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Classify one reading against its range entry.
    ///
    /// Sensors without a range entry (digital or unknown) are neutral.
    pub fn validate_sensor_reading(&self, name: &str, value: f64, role: Role) -> SensorCheck {
        let Some(range) = sensors::range(name) else {
            return SensorCheck {
                status: AlertStatus::Normal,
                message: "Sensor not in validation range".to_string(),
                score: 100,
                recommendations: Vec::new(),
            };
        };

        let class = RangeClass::classify(range, value);
        let unit = range.unit;
        let band = format!(
            "{}-{}{unit}",
            format_limit(range.normal_min),
            format_limit(range.normal_max)
        );

        let (score, message) = match class {
            RangeClass::CriticalLow => (
                30,
                format!(
                    "CRITICAL: {name} reading {value:.2}{unit} is dangerously low (below {}{unit})",
                    format_limit(range.critical_low)
                ),
            ),
            RangeClass::CriticalHigh => (
                30,
                format!(
                    "CRITICAL: {name} reading {value:.2}{unit} is dangerously high (above {}{unit})",
                    format_limit(range.critical_high)
                ),
            ),
            RangeClass::WarningLow => (
                70,
                format!("WARNING: {name} reading {value:.2}{unit} below normal range ({band})"),
            ),
            RangeClass::WarningHigh => (
                70,
                format!("WARNING: {name} reading {value:.2}{unit} above normal range ({band})"),
            ),
            RangeClass::Normal => (
                100,
                format!("✓ {name}: {value:.2}{unit} within normal range ({band})"),
            ),
        };

        let recommendations = class
            .condition(name)
            .map(|c| recommendations(&c, role))
            .unwrap_or_default();

        SensorCheck {
            status: class.status(),
            message,
            score,
            recommendations,
        }
    }

    /// One alert per cross-sensor rule that fires, in rule order.
    pub fn validate_cross_sensor_correlations(
        &self,
        snapshot: &SensorSnapshot,
        role: Role,
    ) -> Vec<Alert> {
        correlation::evaluate(snapshot, &self.config)
            .iter()
            .map(|finding| Alert {
                status: finding.status(),
                message: finding.message(),
                recommendations: recommendations(&finding.condition(), role),
            })
            .collect()
    }

    pub fn calculate_data_quality_score(&self, snapshot: &SensorSnapshot) -> QualityScore {
        scoring::score(snapshot, &self.config)
    }

    /// Full report: score, explanations for weak components, and alerts.
    ///
    /// Alerts are the per-sensor range alerts followed by the cross-sensor
    /// alerts, stably sorted so non-normal entries come first.
    pub fn generate_data_quality_report(
        &self,
        snapshot: &SensorSnapshot,
        role: Role,
    ) -> QualityReport {
        let score = self.calculate_data_quality_score(snapshot);
        let components = score.component_scores;
        let details = &score.details;

        let factor = |score: f64, reason: String| QualityFactor {
            sensor: "Multiple".to_string(),
            score,
            reason,
        };
        let mut quality_factors = Vec::new();
        if components.range_compliance < 100.0 {
            quality_factors.push(factor(
                components.range_compliance,
                format!(
                    "Range violations detected: {} warnings, {} critical",
                    details.range_violations, details.critical_violations
                ),
            ));
        }
        if components.cross_correlation < 100.0 {
            quality_factors.push(factor(
                components.cross_correlation,
                format!(
                    "Cross-correlation issues detected: {} violations",
                    details.correlation_violations
                ),
            ));
        }
        if components.completeness < 100.0 {
            quality_factors.push(factor(
                components.completeness,
                format!("Incomplete data: {} sensors missing", details.missing_sensors.join(", ")),
            ));
        }
        if components.signal_stability < 100.0 {
            quality_factors.push(factor(
                components.signal_stability,
                format!(
                    "Signal stability concerns: {} extreme values detected",
                    details.extreme_values
                ),
            ));
        }

        let mut alerts: Vec<Alert> = scoring::analog_readings(snapshot)
            .filter_map(|(range, value)| {
                let class = RangeClass::classify(range, value);
                let band = match class.status() {
                    AlertStatus::Critical => "critical",
                    AlertStatus::Warning => "normal",
                    AlertStatus::Normal => return None,
                };
                let condition = class.condition(range.name)?;
                Some(Alert {
                    status: class.status(),
                    message: format!(
                        "{} reading {value:.2}{} out of {band} range",
                        range.name, range.unit
                    ),
                    recommendations: recommendations(&condition, role),
                })
            })
            .collect();
        alerts.extend(self.validate_cross_sensor_correlations(snapshot, role));
        sort_alerts(&mut alerts);

        let overall_status = if score.overall_score < self.config.quality_critical_below {
            AlertStatus::Critical
        } else if score.overall_score < self.config.quality_warning_below {
            AlertStatus::Warning
        } else {
            AlertStatus::Normal
        };

        QualityReport {
            overall_status,
            overall_score: score.overall_score,
            component_scores: components,
            quality_factors,
            alerts,
            details: score.details,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> SensorValidator {
        SensorValidator::with_config(ValidationConfig::default())
    }

    fn nominal_snapshot() -> SensorSnapshot {
        [
            ("TP2", 8.0),
            ("TP3", 9.0),
            ("H1", 1.0),
            ("DV_pressure", 1.0),
            ("Reservoirs", 9.0),
            ("Motor_current", 5.0),
            ("Oil_temperature", 55.0),
            ("DV_eletric", 1.0),
            ("Oil_level", 0.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// The seven analog readings alone, all mid-band
    fn analog_only_snapshot() -> SensorSnapshot {
        [
            ("TP2", 8.0),
            ("TP3", 9.0),
            ("H1", 1.0),
            ("DV_pressure", 0.5),
            ("Reservoirs", 9.0),
            ("Motor_current", 4.0),
            ("Oil_temperature", 55.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_unknown_sensor_is_neutral() {
        for role in Role::ALL {
            let check = validator().validate_sensor_reading("Vibration_X", 1e9, role);
            assert_eq!(check.status, AlertStatus::Normal);
            assert_eq!(check.score, 100);
            assert!(check.recommendations.is_empty());
            assert_eq!(check.message, "Sensor not in validation range");
        }
    }

    #[test]
    fn test_digital_sensor_is_neutral() {
        let check = validator().validate_sensor_reading("Oil_level", 1.0, Role::PlantManager);
        assert_eq!(check.status, AlertStatus::Normal);
    }

    #[test]
    fn test_critical_low_message_and_recommendation() {
        let check = validator().validate_sensor_reading("TP2", 1.5, Role::MaintenanceEngineer);
        assert_eq!(check.status, AlertStatus::Critical);
        assert_eq!(check.score, 30);
        assert_eq!(
            check.message,
            "CRITICAL: TP2 reading 1.50bar is dangerously low (below 2.0bar)"
        );
        assert_eq!(check.recommendations.len(), 1);
        assert!(check.recommendations[0].starts_with("Check for leaks in TP2 line"));
    }

    #[test]
    fn test_boundaries_fall_into_adjacent_tier() {
        let v = validator();
        // Oil_temperature: critical_low 25, normal 40-65, critical_high 70
        assert_eq!(
            v.validate_sensor_reading("Oil_temperature", 25.0, Role::PlantManager).status,
            AlertStatus::Warning,
            "exactly critical_low is not critical"
        );
        assert_eq!(
            v.validate_sensor_reading("Oil_temperature", 40.0, Role::PlantManager).status,
            AlertStatus::Normal,
            "exactly normal_min is normal"
        );
        assert_eq!(
            v.validate_sensor_reading("Oil_temperature", 65.0, Role::PlantManager).status,
            AlertStatus::Normal
        );
        assert_eq!(
            v.validate_sensor_reading("Oil_temperature", 70.0, Role::PlantManager).status,
            AlertStatus::Warning
        );
    }

    #[test]
    fn test_critical_bounds_are_strict_for_every_analog_sensor() {
        let v = validator();
        for range in &sensors::ANALOG_SENSORS {
            for edge in [range.critical_low, range.critical_high] {
                assert_ne!(
                    v.validate_sensor_reading(range.name, edge, Role::PlantManager).status,
                    AlertStatus::Critical,
                    "{} at {edge}",
                    range.name
                );
            }
            for outside in [range.critical_low - 1e-6, range.critical_high + 1e-6] {
                assert_eq!(
                    v.validate_sensor_reading(range.name, outside, Role::PlantManager).status,
                    AlertStatus::Critical,
                    "{} at {outside}",
                    range.name
                );
            }
            // Normal-band edges are normal unless they sit outside the critical band
            for edge in [range.normal_min, range.normal_max] {
                let expected = if edge < range.critical_low || edge > range.critical_high {
                    AlertStatus::Critical
                } else {
                    AlertStatus::Normal
                };
                assert_eq!(
                    v.validate_sensor_reading(range.name, edge, Role::PlantManager).status,
                    expected,
                    "{} at {edge}",
                    range.name
                );
            }
        }
    }

    #[test]
    fn test_normal_reading_confirmation() {
        let check = validator().validate_sensor_reading("Oil_temperature", 55.0, Role::MlEngineer);
        assert_eq!(check.message, "✓ Oil_temperature: 55.00°C within normal range (40.0-65.0°C)");
        assert!(check.recommendations.is_empty());
    }

    #[test]
    fn test_all_normal_snapshot_scores_100() {
        let report = validator().generate_data_quality_report(&nominal_snapshot(), Role::PlantManager);
        assert!((report.overall_score - 100.0).abs() < 1e-9);
        assert_eq!(report.overall_status, AlertStatus::Normal);
        assert!(report.alerts.is_empty());
        assert!(report.quality_factors.is_empty());
    }

    #[test]
    fn test_analog_only_snapshot_scores_100() {
        let report = validator().generate_data_quality_report(&analog_only_snapshot(), Role::PlantManager);
        assert!((report.overall_score - 100.0).abs() < 1e-9);
        assert_eq!(report.overall_status, AlertStatus::Normal);
        assert!(report.alerts.is_empty());
        assert!(report.details.missing_sensors.is_empty());
    }

    #[test]
    fn test_oil_temperature_over_limit_scenario() {
        let mut snapshot = analog_only_snapshot();
        snapshot.insert("Oil_temperature".into(), 72.0);
        let v = validator();
        let score = v.calculate_data_quality_score(&snapshot);
        assert_eq!(score.details.critical_violations, 1);
        assert_eq!(score.component_scores.range_compliance, 60.0);
        assert_eq!(score.component_scores.signal_stability, 100.0, "72 is below 65 + 12.5");

        let report = v.generate_data_quality_report(&snapshot, Role::PlantManager);
        assert!((report.overall_score - 84.0).abs() < 1e-9, "{}", report.overall_score);
        assert_eq!(report.overall_status, AlertStatus::Normal, "84 clears the 80 warning line");
        assert!(report.has_critical_alert());
    }

    #[test]
    fn test_pressure_mismatch_scenario() {
        let mut snapshot = nominal_snapshot();
        snapshot.insert("TP3".into(), 9.0);
        snapshot.insert("Reservoirs".into(), 7.0);
        let v = validator();
        let score = v.calculate_data_quality_score(&snapshot);
        assert_eq!(score.component_scores.cross_correlation, 75.0);

        let alerts = v.validate_cross_sensor_correlations(&snapshot, Role::PlantManager);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("2.00bar"), "{}", alerts[0].message);
    }

    #[test]
    fn test_low_oil_in_report_alerts() {
        let mut snapshot = nominal_snapshot();
        snapshot.insert("Oil_level".into(), 1.0);
        let report = validator().generate_data_quality_report(&snapshot, Role::MlEngineer);
        assert!(report.has_critical_alert());
        assert!(report
            .alerts
            .iter()
            .any(|a| a.message == "CRITICAL: Low oil level detected - immediate shutdown required"));
        assert!((report.overall_score - 100.0).abs() < 1e-9, "oil rule is not scored");
    }

    #[test]
    fn test_report_alerts_and_factors() {
        let mut snapshot = nominal_snapshot();
        snapshot.insert("Oil_temperature".into(), 72.0);
        snapshot.remove("H1");
        let report = validator().generate_data_quality_report(&snapshot, Role::PlantManager);

        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].message, "Oil_temperature reading 72.00°C out of critical range");
        assert_eq!(report.alerts[0].recommendations.len(), 1);

        let reasons: Vec<&str> = report.quality_factors.iter().map(|f| f.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "Range violations detected: 0 warnings, 1 critical",
                "Incomplete data: H1 sensors missing",
            ]
        );
    }
}
