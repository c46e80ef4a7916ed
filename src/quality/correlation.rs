//! Cross-sensor consistency rules
//!
//! Three rules, evaluated independently and in a fixed order:
//! 1. TP3 and Reservoirs should read the same pressure (within tolerance)
//! 2. High motor current implies the outlet valve (DV_eletric) is open
//! 3. Oil_level == 1 is a low-oil emergency
//!
//! Only the first two feed the cross-correlation score. The oil rule is a
//! safety alert, not a consistency violation.

use crate::config::ValidationConfig;
use crate::recommendations::Condition;
use crate::types::{AlertStatus, SensorSnapshot};

/// A rule that fired for one snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationFinding {
    PressureMismatch { tp3: f64, reservoirs: f64, diff: f64 },
    ValveClosedUnderLoad { motor_current: f64 },
    LowOil,
}

impl CorrelationFinding {
    pub fn status(&self) -> AlertStatus {
        match self {
            CorrelationFinding::LowOil => AlertStatus::Critical,
            _ => AlertStatus::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CorrelationFinding::PressureMismatch { tp3, reservoirs, diff } => format!(
                "Pressure mismatch: TP3 ({tp3:.2}bar) and Reservoirs ({reservoirs:.2}bar) differ by {diff:.2}bar"
            ),
            CorrelationFinding::ValveClosedUnderLoad { motor_current } => format!(
                "Inconsistent state: High motor current ({motor_current:.2}A) but outlet valve (DV_eletric) is closed"
            ),
            CorrelationFinding::LowOil => {
                "CRITICAL: Low oil level detected - immediate shutdown required".to_string()
            }
        }
    }

    pub fn condition(&self) -> Condition<'static> {
        match self {
            CorrelationFinding::PressureMismatch { .. } => Condition::PressureMismatch,
            CorrelationFinding::ValveClosedUnderLoad { .. } => Condition::ValveCurrentMismatch,
            CorrelationFinding::LowOil => Condition::LowOil,
        }
    }

    /// Whether the finding counts against the cross-correlation component
    pub fn is_scored(&self) -> bool {
        !matches!(self, CorrelationFinding::LowOil)
    }
}

/// Evaluate every rule against `snapshot`, in rule order.
pub fn evaluate(snapshot: &SensorSnapshot, config: &ValidationConfig) -> Vec<CorrelationFinding> {
    let mut findings = Vec::new();

    if let (Some(&tp3), Some(&reservoirs)) = (snapshot.get("TP3"), snapshot.get("Reservoirs")) {
        let diff = (tp3 - reservoirs).abs();
        if diff > config.pressure_match_tolerance_bar {
            findings.push(CorrelationFinding::PressureMismatch { tp3, reservoirs, diff });
        }
    }

    if let (Some(&motor_current), Some(&valve)) =
        (snapshot.get("Motor_current"), snapshot.get("DV_eletric"))
    {
        if motor_current > config.motor_current_high_amps && valve == 0.0 {
            findings.push(CorrelationFinding::ValveClosedUnderLoad { motor_current });
        }
    }

    if snapshot.get("Oil_level").copied() == Some(1.0) {
        findings.push(CorrelationFinding::LowOil);
    }

    findings
}
