//! Trend findings: reliability and parameter-shift insights, plus the
//! per-parameter threshold and deviation analysis.

use crate::config::TrendConfig;
use crate::recommendations::{recommendations, Condition};
use crate::sensors::{self, format_limit};
use crate::types::{DetailedTrendAnalysis, ParameterAnalysis, Role};

use super::stats::{mean, sample_std};

/// One requested parameter's values over the filtered records
pub struct Series<'a> {
    pub parameter: &'a str,
    pub values: Vec<Option<f64>>,
}

impl Series<'_> {
    fn present(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    fn present_tail(&self, n: usize) -> Vec<f64> {
        self.values[self.values.len().saturating_sub(n)..]
            .iter()
            .flatten()
            .copied()
            .collect()
    }
}

/// Reliability warning and parameter-shift warnings.
///
/// Only meaningful with more than one record; returns nothing otherwise.
pub fn shift_insights(failures: &[f64], series: &[Series<'_>], config: &TrendConfig) -> Vec<String> {
    let mut insights = Vec::new();
    if failures.len() <= 1 {
        return insights;
    }

    let recent = &failures[failures.len().saturating_sub(config.recent_window)..];
    let recent_failure_rate = mean(recent);
    if recent_failure_rate > mean(failures) {
        insights.push(format!(
            "CRITICAL: System reliability deteriorating - Recent failure rate increased to {:.1}%",
            recent_failure_rate * 100.0
        ));
    }

    for s in series {
        let overall = mean(&s.present());
        let recent = mean(&s.present_tail(config.recent_window));
        if overall == 0.0 || !overall.is_finite() || !recent.is_finite() {
            continue;
        }
        let change_pct = (recent - overall) / overall * 100.0;
        if change_pct.abs() > config.percent_change_threshold {
            let direction = if change_pct > 0.0 { "increased" } else { "decreased" };
            insights.push(format!(
                "WARNING: {} has {direction} by {:.1}% from historical average",
                s.parameter,
                change_pct.abs()
            ));
        }
    }

    insights
}

/// Result of the per-parameter pass
pub struct ParameterFindings {
    pub detailed: DetailedTrendAnalysis,
    /// Recommendations raised by individual parameter flags, before the
    /// role-level closing lines
    pub parameter_recommendations: Vec<String>,
}

/// Threshold-proximity and deviation analysis for parameters with a range
/// entry. Other parameters are skipped.
pub fn analyze_parameters(series: &[Series<'_>], role: Role, config: &TrendConfig) -> ParameterFindings {
    let mut detailed = DetailedTrendAnalysis::default();

    for s in series {
        let Some(range) = sensors::range(s.parameter) else {
            continue;
        };
        let present = s.present();
        let current = s.values.last().copied().flatten();
        let avg = mean(&present);
        let std = sample_std(&present);

        detailed.parameters.push(ParameterAnalysis {
            parameter: s.parameter.to_string(),
            current_value: current,
            mean: avg,
            std,
            max: present.iter().copied().fold(f64::NAN, f64::max),
            min: present.iter().copied().fold(f64::NAN, f64::min),
            unit: range.unit.to_string(),
            description: range.description.to_string(),
        });

        let Some(current) = current else {
            continue;
        };
        let unit = range.unit;

        if current > range.critical_high * config.approach_high_factor {
            detailed.critical_issues.push(format!(
                "{} at {:.1}% of critical threshold ({current:.2} vs limit {} {unit})",
                s.parameter,
                current / range.critical_high * 100.0,
                format_limit(range.critical_high)
            ));
            detailed.recommendations.extend(recommendations(
                &Condition::ApproachingHigh { parameter: s.parameter, current, unit },
                role,
            ));
        } else if current < range.critical_low * config.approach_low_factor {
            detailed.critical_issues.push(format!(
                "{} at {:.1}% of minimum threshold ({current:.2} vs limit {} {unit})",
                s.parameter,
                current / range.critical_low * 100.0,
                format_limit(range.critical_low)
            ));
            detailed.recommendations.extend(recommendations(
                &Condition::ApproachingLow { parameter: s.parameter, current, unit },
                role,
            ));
        }

        if (current - avg).abs() > config.deviation_sigma * std {
            detailed.summary.push(format!(
                "{} showing significant deviation: current {current:.2} vs average {avg:.2} {unit}",
                s.parameter
            ));
            detailed
                .recommendations
                .extend(recommendations(&Condition::Deviation { parameter: s.parameter }, role));
        }
    }

    let parameter_recommendations = detailed.recommendations.clone();

    let issues = detailed.critical_issues.clone();
    match role {
        Role::PlantManager if !issues.is_empty() => {
            detailed
                .recommendations
                .extend(recommendations(&Condition::CriticalIssuesPresent, role));
        }
        Role::MaintenanceEngineer => {
            for issue in &issues {
                detailed
                    .recommendations
                    .extend(recommendations(&Condition::IssueDiagnostic { issue: issue.as_str() }, role));
            }
        }
        Role::MlEngineer if issues.len() > 2 => {
            detailed
                .recommendations
                .extend(recommendations(&Condition::ManyIssues, role));
        }
        _ => {}
    }

    ParameterFindings {
        detailed,
        parameter_recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series<'a>(parameter: &'a str, values: &[f64]) -> Series<'a> {
        Series {
            parameter,
            values: values.iter().copied().map(Some).collect(),
        }
    }

    #[test]
    fn test_single_record_has_no_shift_insights() {
        let s = [series("TP2", &[8.0])];
        assert!(shift_insights(&[1.0], &s, &TrendConfig::default()).is_empty());
    }

    #[test]
    fn test_reliability_and_parameter_shift() {
        let mut failures = vec![0.0; 20];
        failures.extend([1.0; 10]);
        let mut values = vec![5.0; 20];
        values.extend([8.0; 10]);
        let s = [series("Motor_current", &values)];

        let insights = shift_insights(&failures, &s, &TrendConfig::default());
        assert_eq!(
            insights,
            vec![
                "CRITICAL: System reliability deteriorating - Recent failure rate increased to 100.0%"
                    .to_string(),
                "WARNING: Motor_current has increased by 33.3% from historical average".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_mean_parameter_skipped() {
        let s = [series("DV_pressure", &[0.0, 0.0, 0.0])];
        assert!(shift_insights(&[0.0, 0.0, 0.0], &s, &TrendConfig::default()).is_empty());
    }

    #[test]
    fn test_approaching_high_per_role() {
        // TP3 critical_high 10.0; 9.5 > 9.0
        let s = [series("TP3", &[9.5, 9.5, 9.5])];
        let pm = analyze_parameters(&s, Role::PlantManager, &TrendConfig::default());
        assert_eq!(pm.detailed.critical_issues, vec!["TP3 at 95.0% of critical threshold (9.50 vs limit 10.0 bar)"]);
        assert_eq!(pm.parameter_recommendations.len(), 1);
        assert!(pm.detailed.recommendations.last().unwrap().contains("Schedule immediate maintenance"));

        let me = analyze_parameters(&s, Role::MaintenanceEngineer, &TrendConfig::default());
        assert!(me.detailed.recommendations.last().unwrap().starts_with("Technical Alert: TP3 at 95.0%"));

        let ml = analyze_parameters(&s, Role::MlEngineer, &TrendConfig::default());
        assert_eq!(ml.detailed.recommendations.len(), 1, "retraining line needs more than two issues");
    }

    #[test]
    fn test_unknown_parameter_skipped_and_deviation_flagged() {
        let mut values = vec![55.0; 9];
        values.push(60.0);
        let s = [series("Caudal_impulses", &[1.0, 0.0]), series("Oil_temperature", &values)];
        let findings = analyze_parameters(&s, Role::MlEngineer, &TrendConfig::default());
        assert_eq!(findings.detailed.parameters.len(), 1);
        assert_eq!(findings.detailed.summary.len(), 1);
        assert!(findings.detailed.summary[0].starts_with("Oil_temperature showing significant deviation"));
        assert!(findings.parameter_recommendations[0].starts_with("Statistical Anomaly: Oil_temperature"));
    }
}
