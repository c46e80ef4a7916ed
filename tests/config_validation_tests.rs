//! Config Validation Tests
//!
//! Typo detection on raw TOML, consistency validation on parsed configs, and
//! plausibility warnings. These exercise the config layer independently from
//! the scoring and monitoring components.

use apu_monitor::config::validation::{
    known_config_keys, suggest_correction, validate_plausibility, validate_unknown_keys,
};
use apu_monitor::config::{ConfigError, MonitorConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_drift_window_warns_with_suggestion() {
    let toml_str = r#"
[monitor]
drift_windw = 40
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("drift_windw"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("monitor.drift_window"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn typo_in_weight_warns() {
    let toml_str = r#"
[validation]
weight_completenes = 0.2
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("validation.weight_completeness")
    );
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[validation]
weight_range_compliance = 0.4
weight_cross_correlation = 0.3
weight_completeness = 0.2
weight_signal_stability = 0.1
pressure_match_tolerance_bar = 0.5
motor_current_high_amps = 6.0

[monitor]
history_capacity = 1000
drift_window = 50
rate_warning_delta = 0.3
rate_critical_delta = 0.5

[trend]
direction_window = 50
recent_window = 10
rolling_window = 10

[storage]
history_file = "data/history.json"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Unexpected warnings: {warnings:?}");
}

#[test]
fn unrelated_key_gets_no_suggestion() {
    let toml_str = r#"
[monitor]
completely_unrelated_setting = true
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn unknown_section_is_reported() {
    let toml_str = r#"
[mointor]
drift_window = 50
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(!warnings.is_empty(), "Misspelled section should warn");
}

#[test]
fn syntax_error_yields_no_key_warnings() {
    assert!(validate_unknown_keys("[monitor\ndrift_window = ").is_empty());
}

#[test]
fn every_default_key_is_known() {
    let known = known_config_keys();
    let default_toml = MonitorConfig::default().to_toml().unwrap();
    let warnings = validate_unknown_keys(&default_toml);
    assert!(
        warnings.is_empty(),
        "Serialized defaults must only use known keys: {warnings:?}"
    );
    assert!(known.contains("trend.deviation_sigma"));
    assert_eq!(
        suggest_correction("trend.deviaton_sigma", &known).as_deref(),
        Some("trend.deviation_sigma")
    );
}

// ============================================================================
// Consistency Validation
// ============================================================================

#[test]
fn defaults_are_valid() {
    assert!(MonitorConfig::default().validate().is_ok());
}

#[test]
fn partial_file_keeps_defaults_for_missing_values() {
    let config = MonitorConfig::from_toml_str(
        r#"
[monitor]
drift_window = 25
"#,
    )
    .unwrap();
    assert_eq!(config.monitor.drift_window, 25);
    assert_eq!(config.monitor.history_capacity, 1000);
    assert!((config.validation.weight_range_compliance - 0.40).abs() < 1e-12);
    assert_eq!(config.trend.rolling_window, 10);
}

#[test]
fn weights_must_sum_to_one() {
    let result = MonitorConfig::from_toml_str(
        r#"
[validation]
weight_range_compliance = 0.5
"#,
    );
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("sum to 1.0")), "{errors:?}");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn inverted_drift_deltas_rejected() {
    let result = MonitorConfig::from_toml_str(
        r#"
[monitor]
rate_warning_delta = 0.6
rate_critical_delta = 0.4
"#,
    );
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn zero_window_rejected() {
    let mut config = MonitorConfig::default();
    config.trend.recent_window = 0;
    config.monitor.drift_window = 0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2, "{errors:?}"),
        other => panic!("Expected two validation errors, got {other:?}"),
    }
}

#[test]
fn wrong_value_type_is_parse_error() {
    let result = MonitorConfig::from_toml_str(
        r#"
[monitor]
drift_window = "fifty"
"#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_, _))));
}

#[test]
fn load_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = MonitorConfig::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}

#[test]
fn load_from_file_roundtrips_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apu_monitor.toml");
    std::fs::write(&path, MonitorConfig::default().to_toml().unwrap()).unwrap();
    let loaded = MonitorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, MonitorConfig::default());
}

// ============================================================================
// Plausibility Warnings
// ============================================================================

#[test]
fn defaults_are_plausible() {
    assert!(validate_plausibility(&MonitorConfig::default()).is_empty());
}

#[test]
fn small_history_capacity_warns() {
    let mut config = MonitorConfig::default();
    config.monitor.history_capacity = 60;
    let warnings = validate_plausibility(&config);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "monitor.history_capacity");
}

#[test]
fn out_of_range_confidence_warns() {
    let mut config = MonitorConfig::default();
    config.monitor.min_confidence = 70.0;
    let warnings = validate_plausibility(&config);
    assert!(warnings.iter().any(|w| w.field == "monitor.min_confidence"));
}
