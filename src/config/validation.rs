//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility checks on tuned values.
//!
//! The raw TOML is first parsed into a `toml::Value` and its key tree compared
//! against the known field names. Unknown keys only produce warnings, so an old
//! config with a stale key still loads.

use std::collections::HashSet;

use super::MonitorConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `MonitorConfig`.
///
/// Kept by hand in sync with monitor_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [validation]
        "validation",
        "validation.weight_range_compliance",
        "validation.weight_cross_correlation",
        "validation.weight_completeness",
        "validation.weight_signal_stability",
        "validation.pressure_match_tolerance_bar",
        "validation.motor_current_high_amps",
        "validation.stability_band_factor",
        "validation.quality_critical_below",
        "validation.quality_warning_below",
        // [monitor]
        "monitor",
        "monitor.history_capacity",
        "monitor.drift_window",
        "monitor.rate_warning_delta",
        "monitor.rate_critical_delta",
        "monitor.min_confidence",
        "monitor.min_quality",
        "monitor.health_window",
        "monitor.health_poor_failure_rate",
        "monitor.health_poor_quality",
        "monitor.health_fair_failure_rate",
        "monitor.health_fair_quality",
        // [trend]
        "trend",
        "trend.direction_window",
        "trend.recent_window",
        "trend.percent_change_threshold",
        "trend.deviation_sigma",
        "trend.approach_high_factor",
        "trend.approach_low_factor",
        "trend.rolling_window",
        // [storage]
        "storage",
        "storage.history_file",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Collect every dotted key path in a TOML tree.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3. Ties resolve alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every unknown key in a raw TOML document.
///
/// Syntax errors yield no warnings here; serde reports them afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Plausibility Checks
// ============================================================================

/// Values that load fine but are unlikely to be intended.
pub fn validate_plausibility(config: &MonitorConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |field: &str, message: String| {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message,
            suggestion: None,
        });
    };

    let m = &config.monitor;
    if m.history_capacity < 2 * m.drift_window {
        warn(
            "monitor.history_capacity",
            format!(
                "monitor.history_capacity = {} cannot hold two drift windows of {}; failure-rate shift will never be evaluated",
                m.history_capacity, m.drift_window
            ),
        );
    }
    if !(0.0..=1.0).contains(&m.min_confidence) {
        warn(
            "monitor.min_confidence",
            format!("monitor.min_confidence = {:.2} is outside [0, 1]", m.min_confidence),
        );
    }
    if !(0.0..=100.0).contains(&m.min_quality) {
        warn(
            "monitor.min_quality",
            format!("monitor.min_quality = {:.1} is outside [0, 100]", m.min_quality),
        );
    }

    let v = &config.validation;
    if v.stability_band_factor > 5.0 {
        warn(
            "validation.stability_band_factor",
            format!(
                "validation.stability_band_factor = {:.1} effectively disables the stability check",
                v.stability_band_factor
            ),
        );
    }

    warnings
}
