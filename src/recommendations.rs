//! Audience-specific recommendation text
//!
//! Every detected condition maps to a fixed set of lines per `Role`. The
//! role changes phrasing only; no numeric result ever depends on it.

use crate::types::{HealthStatus, Role};

/// A condition worth telling someone about.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition<'a> {
    // Single-sensor range checks
    CriticalLow { sensor: &'a str },
    CriticalHigh { sensor: &'a str },
    WarningLow { sensor: &'a str },
    WarningHigh { sensor: &'a str },

    // Cross-sensor rules
    PressureMismatch,
    ValveCurrentMismatch,
    LowOil,

    // Drift
    FailureRateShift { change_pct: f64, increasing: bool },
    LowConfidence,
    QualityDegradation,

    // Health
    HealthAction { status: HealthStatus },

    // Trend analysis, per parameter
    ApproachingHigh { parameter: &'a str, current: f64, unit: &'a str },
    ApproachingLow { parameter: &'a str, current: f64, unit: &'a str },
    Deviation { parameter: &'a str },

    // Trend analysis, across parameters
    CriticalIssuesPresent,
    IssueDiagnostic { issue: &'a str },
    ManyIssues,
}

/// Lines to show `role` for `condition`. Empty when the condition is not
/// addressed to that audience.
pub fn recommendations(condition: &Condition<'_>, role: Role) -> Vec<String> {
    use Condition::*;
    use Role::*;

    match (condition, role) {
        (CriticalLow { sensor }, PlantManager) => vec![format!(
            "Immediate action required: {sensor} critically low. Stop operations and investigate system pressure/flow."
        )],
        (CriticalLow { sensor }, MaintenanceEngineer) => vec![format!(
            "Check for leaks in {sensor} line, verify sensor calibration, inspect upstream components for blockages."
        )],
        (CriticalLow { sensor }, MlEngineer) => vec![format!(
            "Data anomaly detected: {sensor} reading outside training distribution. May indicate sensor fault or rare operational state."
        )],

        (CriticalHigh { sensor }, PlantManager) => vec![format!(
            "Emergency: {sensor} at critical levels. Reduce system load immediately to prevent equipment damage."
        )],
        (CriticalHigh { sensor }, MaintenanceEngineer) => vec![format!(
            "Inspect pressure relief valves, check for blockages in {sensor} circuit, verify cooling system if temperature-related."
        )],
        (CriticalHigh { sensor }, MlEngineer) => vec![format!(
            "Outlier detected: {sensor} exceeds normal operating envelope. Model predictions may be less reliable in this regime."
        )],

        (WarningLow { sensor }, PlantManager) => vec![format!(
            "Monitor {sensor} closely. Schedule inspection within 24 hours."
        )],
        (WarningLow { sensor }, MaintenanceEngineer) => vec![format!(
            "Investigate {sensor} trend. Check for minor leaks or sensor drift."
        )],
        (WarningLow { sensor }, MlEngineer) => vec![format!(
            "{sensor} approaching low boundary of training data. Monitor model confidence."
        )],

        (WarningHigh { sensor }, PlantManager) => vec![format!(
            "{sensor} elevated. Increase monitoring frequency and prepare for maintenance."
        )],
        (WarningHigh { sensor }, MaintenanceEngineer) => vec![format!(
            "Check {sensor} system for early signs of blockage or excessive load."
        )],
        (WarningHigh { sensor }, MlEngineer) => vec![format!(
            "{sensor} in high operational zone. Feature importance may shift in predictions."
        )],

        (PressureMismatch, PlantManager) => vec![
            "Pressure discrepancy detected between pneumatic panel and reservoirs. Investigate for leakage or valve issues.".into(),
        ],
        (PressureMismatch, MaintenanceEngineer) => vec![
            "Check pneumatic lines between TP3 and reservoirs for leaks. Inspect isolation valves and pressure regulators.".into(),
        ],
        (PressureMismatch, MlEngineer) => vec![
            "Feature correlation deviation detected. Model may identify this as anomalous pattern.".into(),
        ],

        (ValveCurrentMismatch, PlantManager) => vec![
            "System configuration error: motor running but valve closed. This indicates control system malfunction.".into(),
        ],
        (ValveCurrentMismatch, MaintenanceEngineer) => vec![
            "Verify DV_eletric valve operation. Check control system signals and valve actuator functionality.".into(),
        ],
        (ValveCurrentMismatch, MlEngineer) => vec![
            "State inconsistency: features suggest conflicting operational modes. May confuse model predictions.".into(),
        ],

        (LowOil, PlantManager) => vec![
            "EMERGENCY: Stop all operations immediately. Low oil will cause catastrophic compressor damage within minutes.".into(),
        ],
        (LowOil, MaintenanceEngineer) => vec![
            "URGENT: Shutdown compressor NOW. Refill oil to proper level, check for leaks, inspect oil pump operation before restart.".into(),
        ],
        (LowOil, MlEngineer) => vec![
            "Critical safety feature triggered. Model will strongly predict failure - this is expected and correct behavior.".into(),
        ],

        (FailureRateShift { increasing, .. }, PlantManager) => vec![
            "Operating conditions have changed significantly. Review recent maintenance activities and operational parameters.".into(),
            if *increasing {
                "Failure predictions increasing - equipment may be degrading. Schedule comprehensive inspection.".into()
            } else {
                "Failure predictions decreasing - verify if recent maintenance/adjustments were effective.".into()
            },
        ],
        (FailureRateShift { .. }, MaintenanceEngineer) => vec![
            "Pattern shift detected in failure predictions. Compare current sensor readings to historical baselines.".into(),
            "Document any recent repairs, part replacements, or configuration changes that may explain this shift.".into(),
        ],
        (FailureRateShift { change_pct, .. }, MlEngineer) => vec![
            format!("Concept drift detected: prediction distribution has shifted by {change_pct:.1}%."),
            "Model may need retraining if this represents genuine operational regime change vs. temporary anomaly.".into(),
            "Investigate if feature distributions have shifted outside training envelope.".into(),
        ],

        (LowConfidence, PlantManager) => vec![
            "System operating in uncertain conditions. Increase monitoring frequency until patterns stabilize.".into(),
        ],
        (LowConfidence, MaintenanceEngineer) => vec![
            "Sensor readings may be ambiguous or transitional. Verify all sensors are functioning correctly.".into(),
        ],
        (LowConfidence, MlEngineer) => vec![
            "Model uncertainty elevated. System may be in state not well-represented in training data.".into(),
        ],

        (QualityDegradation, PlantManager) => vec![
            "Multiple sensor anomalies detected. System reliability compromised - schedule immediate diagnostic check.".into(),
        ],
        (QualityDegradation, MaintenanceEngineer) => vec![
            "Sensor performance declining. Calibrate all sensors and check for physical damage or environmental issues.".into(),
        ],
        (QualityDegradation, MlEngineer) => vec![
            "Input data quality declining. Model predictions may be unreliable. Prioritize sensor maintenance.".into(),
        ],

        (HealthAction { status }, role) => health_action(*status, role).into_iter().collect(),

        (ApproachingHigh { parameter, current, unit }, PlantManager) => vec![format!(
            "URGENT: {parameter} approaching critical high limit. Current: {current:.2} {unit}"
        )],
        (ApproachingHigh { parameter, .. }, MaintenanceEngineer) => vec![format!(
            "Technical Alert: {parameter} near critical high threshold. Inspect relief valves and cooling circuit."
        )],
        (ApproachingHigh { parameter, current, unit }, MlEngineer) => vec![format!(
            "Envelope Alert: {parameter} nearing upper edge of training range. Current: {current:.2} {unit}"
        )],

        (ApproachingLow { parameter, current, unit }, PlantManager) => vec![format!(
            "URGENT: {parameter} approaching critical low limit. Current: {current:.2} {unit}"
        )],
        (ApproachingLow { parameter, .. }, MaintenanceEngineer) => vec![format!(
            "Technical Alert: {parameter} near critical low threshold. Inspect and calibrate sensor."
        )],
        (ApproachingLow { parameter, current, unit }, MlEngineer) => vec![format!(
            "Envelope Alert: {parameter} nearing lower edge of training range. Current: {current:.2} {unit}"
        )],

        (Deviation { parameter }, PlantManager) => vec![format!(
            "{parameter} departing from its usual operating level. Increase monitoring frequency."
        )],
        (Deviation { parameter }, MaintenanceEngineer) => vec![format!(
            "Investigate {parameter}: current reading deviates strongly from its recent average."
        )],
        (Deviation { parameter }, MlEngineer) => vec![format!(
            "Statistical Anomaly: {parameter} outside 2σ bounds. Check for concept drift."
        )],

        (CriticalIssuesPresent, PlantManager) => vec![
            "URGENT: Multiple parameters approaching critical thresholds. Schedule immediate maintenance.".into(),
        ],
        (IssueDiagnostic { issue }, MaintenanceEngineer) => vec![format!(
            "Technical Alert: {issue} - Perform detailed diagnostic and calibration check."
        )],
        (ManyIssues, MlEngineer) => vec![
            "Multiple parameters showing anomalous behavior. Consider model retraining with recent data.".into(),
        ],
        (CriticalIssuesPresent | IssueDiagnostic { .. } | ManyIssues, _) => Vec::new(),
    }
}

fn health_action(status: HealthStatus, role: Role) -> Option<String> {
    use HealthStatus::*;
    use Role::*;

    let line = match (status, role) {
        (Poor, PlantManager) => "Plan downtime for a full APU inspection before the next shift.",
        (Poor, MaintenanceEngineer) => "Run a full diagnostic: verify sensor calibration, oil level, and valve actuators.",
        (Poor, MlEngineer) => "Audit recent inputs for out-of-distribution data before trusting model output.",
        (Fair, PlantManager) => "Schedule preventive maintenance within the week.",
        (Fair, MaintenanceEngineer) => "Review flagged sensors and compare readings against historical baselines.",
        (Fair, MlEngineer) => "Track prediction confidence and failure rate for emerging drift.",
        (Good, PlantManager) => "Continue routine operations and scheduled maintenance.",
        (Good, MaintenanceEngineer) => "Keep the regular inspection and calibration schedule.",
        (Good, MlEngineer) => "Model operating within its training envelope; no action needed.",
        (Unknown | Error, _) => return None,
    };
    Some(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_range_condition_has_text_for_every_role() {
        let conditions = [
            Condition::CriticalLow { sensor: "TP2" },
            Condition::CriticalHigh { sensor: "TP2" },
            Condition::WarningLow { sensor: "TP2" },
            Condition::WarningHigh { sensor: "TP2" },
            Condition::PressureMismatch,
            Condition::ValveCurrentMismatch,
            Condition::LowOil,
            Condition::LowConfidence,
            Condition::QualityDegradation,
        ];
        for condition in &conditions {
            for role in Role::ALL {
                assert_eq!(
                    recommendations(condition, role).len(),
                    1,
                    "{condition:?} for {role} should yield exactly one line"
                );
            }
        }
    }

    #[test]
    fn test_sensor_name_interpolated() {
        let lines = recommendations(&Condition::CriticalLow { sensor: "Reservoirs" }, Role::PlantManager);
        assert!(lines[0].contains("Reservoirs critically low"));
    }

    #[test]
    fn test_rate_shift_direction_line() {
        let up = recommendations(
            &Condition::FailureRateShift { change_pct: 40.0, increasing: true },
            Role::PlantManager,
        );
        assert_eq!(up.len(), 2);
        assert!(up[1].starts_with("Failure predictions increasing"));

        let ml = recommendations(
            &Condition::FailureRateShift { change_pct: 40.0, increasing: false },
            Role::MlEngineer,
        );
        assert_eq!(ml.len(), 3);
        assert!(ml[0].contains("40.0%"));
    }

    #[test]
    fn test_role_gated_trend_tail() {
        assert!(recommendations(&Condition::ManyIssues, Role::PlantManager).is_empty());
        assert_eq!(recommendations(&Condition::ManyIssues, Role::MlEngineer).len(), 1);
        assert!(recommendations(&Condition::CriticalIssuesPresent, Role::MlEngineer).is_empty());
    }

    #[test]
    fn test_no_health_action_without_status() {
        assert!(recommendations(
            &Condition::HealthAction { status: HealthStatus::Unknown },
            Role::PlantManager
        )
        .is_empty());
    }
}
