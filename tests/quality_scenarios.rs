//! Data quality scenarios
//!
//! End-to-end checks of the sensor validator through the public API:
//! snapshot parsing, report composition, and randomized bounds on the
//! composite score.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use apu_monitor::config::ValidationConfig;
use apu_monitor::sensors::{self, ANALOG_SENSORS, DIGITAL_SENSORS};
use apu_monitor::{AlertStatus, Role, SensorSnapshot, SensorValidator};

fn validator() -> SensorValidator {
    SensorValidator::with_config(ValidationConfig::default())
}

/// Random reading spanning well past both critical limits
fn random_reading(rng: &mut StdRng, name: &str) -> f64 {
    match sensors::range(name) {
        Some(r) => {
            let span = (r.critical_high - r.critical_low).abs().max(1.0);
            rng.gen_range((r.critical_low - span)..(r.critical_high + span))
        }
        None => f64::from(rng.gen_range(0u8..=1)),
    }
}

#[test]
fn composite_score_stays_in_bounds_and_ignores_insertion_order() {
    let mut rng = StdRng::seed_from_u64(0x00A9_0001);
    let v = validator();

    for _ in 0..500 {
        let mut readings: Vec<(String, f64)> = ANALOG_SENSORS
            .iter()
            .map(|r| r.name)
            .chain(DIGITAL_SENSORS.iter().map(|d| d.name))
            .filter(|_| rng.gen_bool(0.8))
            .map(|name| (name.to_string(), 0.0))
            .collect();
        for (name, value) in readings.iter_mut() {
            *value = random_reading(&mut rng, name);
        }

        let forward: SensorSnapshot = readings.iter().cloned().collect();
        readings.shuffle(&mut rng);
        let shuffled: SensorSnapshot = readings.iter().cloned().collect();

        let a = v.calculate_data_quality_score(&forward);
        let b = v.calculate_data_quality_score(&shuffled);
        assert!(
            (0.0..=100.0).contains(&a.overall_score),
            "score {} out of bounds for {forward:?}",
            a.overall_score
        );
        assert_eq!(a, b, "score depends on insertion order");
    }
}

#[test]
fn parsed_assignments_produce_expected_report() {
    let snapshot = sensors::parse_assignments(
        "TP2=8,TP3=9,H1=1,DV_pressure=1,Reservoirs=7,Motor_current=5,Oil_temperature=55",
    )
    .unwrap();
    let report = validator().generate_data_quality_report(&snapshot, Role::MaintenanceEngineer);

    assert!((report.component_scores.cross_correlation - 75.0).abs() < 1e-9);
    assert!((report.component_scores.range_compliance - 100.0).abs() < 1e-9);
    // 0.4*100 + 0.3*75 + 0.2*100 + 0.1*100
    assert!((report.overall_score - 92.5).abs() < 1e-9);
    assert_eq!(report.overall_status, AlertStatus::Normal);

    let mismatch = report
        .alerts
        .iter()
        .find(|a| a.message.contains("2.00bar"))
        .expect("pressure mismatch alert");
    assert_eq!(mismatch.status, AlertStatus::Warning);
    assert!(!mismatch.recommendations.is_empty());
}

#[test]
fn oil_level_alarm_is_critical_for_every_role() {
    let mut snapshot = SensorSnapshot::new();
    snapshot.insert("Oil_level".to_string(), 1.0);
    for role in Role::ALL {
        let alerts = validator().validate_cross_sensor_correlations(&snapshot, role);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].status, AlertStatus::Critical);
    }
}

#[test]
fn critical_alerts_sort_ahead_of_normal() {
    let snapshot = sensors::parse_assignments("TP2=1.0,Oil_temperature=72,Oil_level=1").unwrap();
    let report = validator().generate_data_quality_report(&snapshot, Role::PlantManager);
    assert!(report.alerts.len() >= 3, "{:?}", report.alerts);
    assert!(report.alerts.iter().all(|a| !a.status.is_normal()));
    assert_eq!(report.overall_status, AlertStatus::Critical, "score {}", report.overall_score);
}

#[test]
fn empty_snapshot_is_incomplete_not_an_error() {
    let report = validator().generate_data_quality_report(&SensorSnapshot::new(), Role::MlEngineer);
    assert_eq!(report.details.missing_sensors.len(), ANALOG_SENSORS.len());
    assert!((report.component_scores.completeness - 0.0).abs() < 1e-9);
    assert!(report
        .quality_factors
        .iter()
        .any(|f| f.reason.starts_with("Incomplete data")));
}

#[test]
fn unknown_sensor_does_not_move_the_score() {
    let base = sensors::parse_assignments(
        "TP2=8,TP3=9,H1=1,DV_pressure=1,Reservoirs=9,Motor_current=5,Oil_temperature=55",
    )
    .unwrap();
    let mut with_unknown = base.clone();
    with_unknown.insert("Vibration_X".to_string(), 1e6);

    let v = validator();
    assert_eq!(
        v.calculate_data_quality_score(&base),
        v.calculate_data_quality_score(&with_unknown)
    );
}
