//! Monitor Configuration - all scoring, drift and trend thresholds as TOML values
//!
//! Each section implements `Default` with the values in `defaults.rs`, so a
//! deployment without a config file runs on the built-in thresholds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

/// Environment variable pointing at a TOML config file
pub const CONFIG_ENV_VAR: &str = "APU_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "apu_monitor.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an APU monitor deployment.
///
/// Load with `MonitorConfig::load()` which searches:
/// 1. `$APU_CONFIG` env var
/// 2. `./apu_monitor.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub monitor: DriftConfig,

    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl MonitorConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded monitor config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded monitor config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only produce warnings.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate thresholds for internal consistency.
    ///
    /// Rules:
    /// - Score weights must sum to 1.0
    /// - Window sizes and capacity must be > 0
    /// - Critical drift delta must be >= warning delta
    /// - Quality tiers and health tiers must be ordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let v = &self.validation;

        let weight_sum = v.weight_range_compliance
            + v.weight_cross_correlation
            + v.weight_completeness
            + v.weight_signal_stability;
        if (weight_sum - 1.0).abs() > 0.001 {
            errors.push(format!(
                "validation weights must sum to 1.0 (got {weight_sum:.3})"
            ));
        }
        for (name, w) in [
            ("weight_range_compliance", v.weight_range_compliance),
            ("weight_cross_correlation", v.weight_cross_correlation),
            ("weight_completeness", v.weight_completeness),
            ("weight_signal_stability", v.weight_signal_stability),
        ] {
            if w < 0.0 {
                errors.push(format!("validation.{name} = {w:.3} cannot be negative"));
            }
        }
        if v.pressure_match_tolerance_bar < 0.0 {
            errors.push(format!(
                "validation.pressure_match_tolerance_bar = {:.3} cannot be negative",
                v.pressure_match_tolerance_bar
            ));
        }
        if v.quality_critical_below > v.quality_warning_below {
            errors.push(format!(
                "validation.quality_critical_below ({:.1}) must be <= quality_warning_below ({:.1})",
                v.quality_critical_below, v.quality_warning_below
            ));
        }

        let m = &self.monitor;
        for (name, n) in [
            ("history_capacity", m.history_capacity),
            ("drift_window", m.drift_window),
            ("health_window", m.health_window),
        ] {
            if n == 0 {
                errors.push(format!("monitor.{name} must be > 0"));
            }
        }
        Self::check_escalation(
            m.rate_warning_delta,
            m.rate_critical_delta,
            "monitor.rate_delta",
            &mut errors,
        );
        Self::check_escalation(
            m.health_fair_failure_rate,
            m.health_poor_failure_rate,
            "monitor.health_failure_rate",
            &mut errors,
        );
        if m.health_poor_quality > m.health_fair_quality {
            errors.push(format!(
                "monitor.health_poor_quality ({:.1}) must be <= health_fair_quality ({:.1})",
                m.health_poor_quality, m.health_fair_quality
            ));
        }

        let t = &self.trend;
        for (name, n) in [
            ("direction_window", t.direction_window),
            ("recent_window", t.recent_window),
            ("rolling_window", t.rolling_window),
        ] {
            if n == 0 {
                errors.push(format!("trend.{name} must be > 0"));
            }
        }
        if t.deviation_sigma <= 0.0 {
            errors.push(format!(
                "trend.deviation_sigma = {:.2} must be > 0",
                t.deviation_sigma
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(warning: f64, critical: f64, name: &str, errors: &mut Vec<String>) {
        if critical < warning {
            errors.push(format!(
                "{name}: critical ({critical:.3}) must be >= warning ({warning:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sensor Validation
// ============================================================================

/// Weights and rule thresholds for the data-quality score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    #[serde(default = "default_weight_range")]
    pub weight_range_compliance: f64,
    #[serde(default = "default_weight_correlation")]
    pub weight_cross_correlation: f64,
    #[serde(default = "default_weight_completeness")]
    pub weight_completeness: f64,
    #[serde(default = "default_weight_stability")]
    pub weight_signal_stability: f64,
    #[serde(default = "default_pressure_tolerance")]
    pub pressure_match_tolerance_bar: f64,
    #[serde(default = "default_motor_current_high")]
    pub motor_current_high_amps: f64,
    #[serde(default = "default_stability_band")]
    pub stability_band_factor: f64,
    #[serde(default = "default_quality_critical")]
    pub quality_critical_below: f64,
    #[serde(default = "default_quality_warning")]
    pub quality_warning_below: f64,
}

fn default_weight_range() -> f64 {
    defaults::WEIGHT_RANGE_COMPLIANCE
}
fn default_weight_correlation() -> f64 {
    defaults::WEIGHT_CROSS_CORRELATION
}
fn default_weight_completeness() -> f64 {
    defaults::WEIGHT_COMPLETENESS
}
fn default_weight_stability() -> f64 {
    defaults::WEIGHT_SIGNAL_STABILITY
}
fn default_pressure_tolerance() -> f64 {
    defaults::PRESSURE_MATCH_TOLERANCE_BAR
}
fn default_motor_current_high() -> f64 {
    defaults::MOTOR_CURRENT_HIGH_AMPS
}
fn default_stability_band() -> f64 {
    defaults::STABILITY_BAND_FACTOR
}
fn default_quality_critical() -> f64 {
    defaults::QUALITY_CRITICAL_BELOW
}
fn default_quality_warning() -> f64 {
    defaults::QUALITY_WARNING_BELOW
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            weight_range_compliance: default_weight_range(),
            weight_cross_correlation: default_weight_correlation(),
            weight_completeness: default_weight_completeness(),
            weight_signal_stability: default_weight_stability(),
            pressure_match_tolerance_bar: default_pressure_tolerance(),
            motor_current_high_amps: default_motor_current_high(),
            stability_band_factor: default_stability_band(),
            quality_critical_below: default_quality_critical(),
            quality_warning_below: default_quality_warning(),
        }
    }
}

// ============================================================================
// Operational Monitor
// ============================================================================

/// History capacity, drift windows and health tiers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_drift_window")]
    pub drift_window: usize,
    #[serde(default = "default_rate_warning")]
    pub rate_warning_delta: f64,
    #[serde(default = "default_rate_critical")]
    pub rate_critical_delta: f64,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_min_quality")]
    pub min_quality: f64,
    #[serde(default = "default_health_window")]
    pub health_window: usize,
    #[serde(default = "default_health_poor_rate")]
    pub health_poor_failure_rate: f64,
    #[serde(default = "default_health_poor_quality")]
    pub health_poor_quality: f64,
    #[serde(default = "default_health_fair_rate")]
    pub health_fair_failure_rate: f64,
    #[serde(default = "default_health_fair_quality")]
    pub health_fair_quality: f64,
}

fn default_history_capacity() -> usize {
    defaults::HISTORY_CAPACITY
}
fn default_drift_window() -> usize {
    defaults::DRIFT_WINDOW
}
fn default_rate_warning() -> f64 {
    defaults::DRIFT_RATE_WARNING_DELTA
}
fn default_rate_critical() -> f64 {
    defaults::DRIFT_RATE_CRITICAL_DELTA
}
fn default_min_confidence() -> f64 {
    defaults::DRIFT_MIN_CONFIDENCE
}
fn default_min_quality() -> f64 {
    defaults::DRIFT_MIN_QUALITY
}
fn default_health_window() -> usize {
    defaults::HEALTH_WINDOW
}
fn default_health_poor_rate() -> f64 {
    defaults::HEALTH_POOR_FAILURE_RATE
}
fn default_health_poor_quality() -> f64 {
    defaults::HEALTH_POOR_QUALITY
}
fn default_health_fair_rate() -> f64 {
    defaults::HEALTH_FAIR_FAILURE_RATE
}
fn default_health_fair_quality() -> f64 {
    defaults::HEALTH_FAIR_QUALITY
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            drift_window: default_drift_window(),
            rate_warning_delta: default_rate_warning(),
            rate_critical_delta: default_rate_critical(),
            min_confidence: default_min_confidence(),
            min_quality: default_min_quality(),
            health_window: default_health_window(),
            health_poor_failure_rate: default_health_poor_rate(),
            health_poor_quality: default_health_poor_quality(),
            health_fair_failure_rate: default_health_fair_rate(),
            health_fair_quality: default_health_fair_quality(),
        }
    }
}

// ============================================================================
// Trend Analysis
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendConfig {
    #[serde(default = "default_direction_window")]
    pub direction_window: usize,
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default = "default_percent_change")]
    pub percent_change_threshold: f64,
    #[serde(default = "default_deviation_sigma")]
    pub deviation_sigma: f64,
    #[serde(default = "default_approach_high")]
    pub approach_high_factor: f64,
    #[serde(default = "default_approach_low")]
    pub approach_low_factor: f64,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
}

fn default_direction_window() -> usize {
    defaults::TREND_DIRECTION_WINDOW
}
fn default_recent_window() -> usize {
    defaults::TREND_RECENT_WINDOW
}
fn default_percent_change() -> f64 {
    defaults::TREND_PERCENT_CHANGE
}
fn default_deviation_sigma() -> f64 {
    defaults::TREND_DEVIATION_SIGMA
}
fn default_approach_high() -> f64 {
    defaults::TREND_APPROACH_HIGH_FACTOR
}
fn default_approach_low() -> f64 {
    defaults::TREND_APPROACH_LOW_FACTOR
}
fn default_rolling_window() -> usize {
    defaults::ROLLING_FAILURE_WINDOW
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            direction_window: default_direction_window(),
            recent_window: default_recent_window(),
            percent_change_threshold: default_percent_change(),
            deviation_sigma: default_deviation_sigma(),
            approach_high_factor: default_approach_high(),
            approach_low_factor: default_approach_low(),
            rolling_window: default_rolling_window(),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
}

fn default_history_file() -> PathBuf {
    PathBuf::from(defaults::HISTORY_FILE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = MonitorConfig::from_toml_str(
            r#"
[monitor]
history_capacity = 250
"#,
        )
        .unwrap();
        assert_eq!(config.monitor.history_capacity, 250);
        assert_eq!(config.monitor.drift_window, defaults::DRIFT_WINDOW);
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let err = MonitorConfig::from_toml_str(
            r#"
[validation]
weight_range_compliance = 0.9
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_inverted_drift_deltas_rejected() {
        let mut config = MonitorConfig::default();
        config.monitor.rate_warning_delta = 0.6;
        config.monitor.rate_critical_delta = 0.4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MonitorConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = MonitorConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
