//! APU sensor vocabulary and snapshot ingestion (CSV replay + CLI assignments)

use crate::types::SensorSnapshot;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Analog Range Table
// ============================================================================

/// Operating envelope of one analog sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRange {
    pub name: &'static str,
    pub normal_min: f64,
    pub normal_max: f64,
    pub critical_low: f64,
    pub critical_high: f64,
    pub unit: &'static str,
    pub description: &'static str,
}

impl SensorRange {
    /// Width of the normal band
    pub fn normal_span(&self) -> f64 {
        self.normal_max - self.normal_min
    }
}

/// The seven analog sensors with their deployed operating limits.
///
/// Some rows have `critical_high` below `normal_max` (TP2, TP3, H1,
/// DV_pressure, Reservoirs, Motor_current). Classification checks the
/// critical band first, so those overlaps resolve to critical.
pub const ANALOG_SENSORS: [SensorRange; 7] = [
    SensorRange {
        name: "TP2",
        normal_min: 6.0,
        normal_max: 10.0,
        critical_low: 2.0,
        critical_high: 9.5,
        unit: "bar",
        description: "Higher values indicate increased compression load, while low values suggest insufficient compression or potential leakage",
    },
    SensorRange {
        name: "TP3",
        normal_min: 7.0,
        normal_max: 11.0,
        critical_low: 6.0,
        critical_high: 10.0,
        unit: "bar",
        description: "Should correlate closely with reservoir pressure. Significant deviations indicate pneumatic system issues",
    },
    SensorRange {
        name: "H1",
        normal_min: 0.1,
        normal_max: 2.0,
        critical_low: 0.05,
        critical_high: 1.8,
        unit: "bar",
        description: "High values suggest filter clogging or blockage, low values may indicate bypass or damaged separator",
    },
    SensorRange {
        name: "DV_pressure",
        normal_min: 0.0,
        normal_max: 2.5,
        critical_low: -0.1,
        critical_high: 2.0,
        unit: "bar",
        description: "Zero values are normal during loaded operation. Non-zero values indicate tower switching or maintenance cycles",
    },
    SensorRange {
        name: "Reservoirs",
        normal_min: 7.0,
        normal_max: 11.0,
        critical_low: 6.5,
        critical_high: 10.5,
        unit: "bar",
        description: "Should closely match TP3 pressure. Major differences indicate leakage or reservoir system faults",
    },
    SensorRange {
        name: "Motor_current",
        normal_min: 0.0,
        normal_max: 9.0,
        critical_low: 0.5,
        critical_high: 8.5,
        unit: "A",
        description: "~0A: motor off, ~4A: offloaded operation, ~7A: under load, ~9A: startup",
    },
    SensorRange {
        name: "Oil_temperature",
        normal_min: 40.0,
        normal_max: 65.0,
        critical_low: 25.0,
        critical_high: 70.0,
        unit: "°C",
        description: "High temperatures cause oil degradation and component wear. Low temperatures may indicate insufficient load",
    },
];

/// Look up the range entry of an analog sensor.
pub fn range(name: &str) -> Option<&'static SensorRange> {
    ANALOG_SENSORS.iter().find(|r| r.name == name)
}

pub fn analog_names() -> impl Iterator<Item = &'static str> {
    ANALOG_SENSORS.iter().map(|r| r.name)
}

/// Render a table limit the way the range table writes it: whole numbers
/// keep one decimal (`2.0`, `-0.1`, `0.05`).
pub fn format_limit(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

// ============================================================================
// Digital Sensors
// ============================================================================

/// A binary (0/1) signal. No range entry; only used by cross-sensor rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DigitalSensor {
    pub name: &'static str,
    pub label: &'static str,
    /// Meaning of the signal when it reads 1
    pub description: &'static str,
}

pub const DIGITAL_SENSORS: [DigitalSensor; 8] = [
    DigitalSensor { name: "COMP", label: "COMP", description: "Air intake valve active" },
    DigitalSensor { name: "DV_eletric", label: "DV Electric", description: "Outlet valve active" },
    DigitalSensor { name: "Towers", label: "Towers", description: "Tower 2 in operation" },
    DigitalSensor { name: "MPG", label: "MPG", description: "Compressor start signal" },
    DigitalSensor { name: "LPS", label: "LPS", description: "Low pressure detected" },
    DigitalSensor { name: "Pressure_switch", label: "Pressure Switch", description: "Tower discharge detected" },
    DigitalSensor { name: "Oil_level", label: "Oil Level", description: "Low oil level detected" },
    DigitalSensor { name: "Caudal_impulses", label: "Caudal Impulses", description: "Air flow detected" },
];

pub fn is_digital(name: &str) -> bool {
    DIGITAL_SENSORS.iter().any(|d| d.name == name)
}

/// Whether `name` belongs to the 15-sensor vocabulary
pub fn is_known(name: &str) -> bool {
    range(name).is_some() || is_digital(name)
}

/// All sensor names, analog first, in table order
pub fn all_names() -> impl Iterator<Item = &'static str> {
    analog_names().chain(DIGITAL_SENSORS.iter().map(|d| d.name))
}

/// Digital signals reading 1 in `snapshot`, in table order
pub fn active_digital(snapshot: &SensorSnapshot) -> Vec<&'static DigitalSensor> {
    DIGITAL_SENSORS
        .iter()
        .filter(|d| snapshot.get(d.name).copied() == Some(1.0))
        .collect()
}

// ============================================================================
// Ingestion
// ============================================================================

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV file {0} has no header row")]
    MissingHeader(String),
    #[error("Invalid sensor assignment '{0}' (expected NAME=VALUE)")]
    Assignment(String),
    #[error("Cannot parse {field} as f64: '{raw}'")]
    Number { field: String, raw: String },
}

/// One replay row: a snapshot plus whatever prediction columns were present
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub line: usize,
    pub timestamp: Option<String>,
    pub snapshot: SensorSnapshot,
    pub prediction: Option<u8>,
    pub probability: Option<f64>,
}

/// Read replay rows from a CSV file.
///
/// Columns are matched by header name: any of the 15 sensor names,
/// plus optional `timestamp`, `prediction` and `probability`. Unknown
/// columns are ignored. Malformed lines are logged and skipped.
pub fn read_csv_rows(path: &Path) -> Result<Vec<CsvRow>, SnapshotError> {
    let file = File::open(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut lines = BufReader::new(file).lines();
    let header = match lines.next() {
        Some(Ok(h)) if !h.trim().is_empty() => h,
        Some(Err(source)) => {
            return Err(SnapshotError::Io {
                path: path.display().to_string(),
                source,
            })
        }
        _ => return Err(SnapshotError::MissingHeader(path.display().to_string())),
    };
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (idx, line_result) in lines.enumerate() {
        let line_num = idx + 2;
        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(line = line_num, error = %e, "Error reading CSV line");
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_csv_line(&columns, &line, line_num) {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!(line = line_num, error = %e, "Error parsing CSV line");
            }
        }
    }

    tracing::info!(count = rows.len(), path = %path.display(), "Loaded sensor rows from CSV");
    Ok(rows)
}

fn parse_csv_line(columns: &[String], line: &str, line_num: usize) -> Result<CsvRow, SnapshotError> {
    let mut row = CsvRow {
        line: line_num,
        timestamp: None,
        snapshot: SensorSnapshot::new(),
        prediction: None,
        probability: None,
    };

    for (column, raw) in columns.iter().zip(line.split(',')) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match column.as_str() {
            "timestamp" => row.timestamp = Some(raw.to_string()),
            "prediction" => {
                let label = parse_f64(raw, column)?;
                row.prediction = Some(u8::from(label >= 0.5));
            }
            "probability" => row.probability = Some(parse_f64(raw, column)?),
            name if is_known(name) => {
                row.snapshot.insert(name.to_string(), parse_f64(raw, name)?);
            }
            _ => {}
        }
    }

    Ok(row)
}

/// Parse `TP2=8.1,TP3=9,Oil_level=0` into a snapshot.
///
/// Names outside the vocabulary are kept; the validator treats them as
/// unknown sensors.
pub fn parse_assignments(input: &str) -> Result<SensorSnapshot, SnapshotError> {
    let mut snapshot = SensorSnapshot::new();
    for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| SnapshotError::Assignment(pair.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SnapshotError::Assignment(pair.to_string()));
        }
        snapshot.insert(name.to_string(), parse_f64(value, name)?);
    }
    Ok(snapshot)
}

fn parse_f64(s: &str, field: &str) -> Result<f64, SnapshotError> {
    s.trim().parse::<f64>().map_err(|_| SnapshotError::Number {
        field: field.to_string(),
        raw: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_range_table_weak_ordering() {
        for r in &ANALOG_SENSORS {
            assert!(r.critical_low < r.critical_high, "{}: critical bounds inverted", r.name);
            assert!(r.normal_min <= r.normal_max, "{}: normal bounds inverted", r.name);
        }
    }

    #[test]
    fn test_vocabulary_has_fifteen_sensors() {
        assert_eq!(all_names().count(), 15);
        assert!(is_digital("Oil_level"));
        assert!(range("Oil_level").is_none());
        assert_eq!(range("Oil_temperature").map(|r| r.unit), Some("°C"));
    }

    #[test]
    fn test_active_digital_signals() {
        let snapshot = parse_assignments("Oil_level=1,COMP=0,DV_eletric=1,TP2=1").unwrap();
        let active = active_digital(&snapshot);
        let names: Vec<&str> = active.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["DV_eletric", "Oil_level"]);
        assert_eq!(active[1].label, "Oil Level");
        assert_eq!(active[1].description, "Low oil level detected");
    }

    #[test]
    fn test_format_limit() {
        assert_eq!(format_limit(2.0), "2.0");
        assert_eq!(format_limit(-0.1), "-0.1");
        assert_eq!(format_limit(0.05), "0.05");
        assert_eq!(format_limit(10.5), "10.5");
    }

    #[test]
    fn test_parse_assignments() {
        let snapshot = parse_assignments("TP2=8.1, TP3=9 ,Oil_level=0").unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get("TP3"), Some(&9.0));

        assert!(matches!(
            parse_assignments("TP2"),
            Err(SnapshotError::Assignment(_))
        ));
        assert!(matches!(
            parse_assignments("TP2=abc"),
            Err(SnapshotError::Number { .. })
        ));
    }

    #[test]
    fn test_read_csv_rows_by_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,TP2,TP3,Oil_level,extra,prediction,probability").unwrap();
        writeln!(file, "2024-03-01T10:00:00,8.0,9.0,0,x,0,0.91").unwrap();
        writeln!(file, "2024-03-01T10:01:00,bad,9.0,0,x,0,0.91").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2024-03-01T10:02:00,5.0,,1,x,1,0.88").unwrap();

        let rows = read_csv_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2, "malformed line should be skipped");
        assert_eq!(rows[0].snapshot.len(), 3);
        assert_eq!(rows[0].prediction, Some(0));
        assert_eq!(rows[1].snapshot.get("TP3"), None, "empty cell means missing sensor");
        assert_eq!(rows[1].prediction, Some(1));
        assert_eq!(rows[1].line, 5);
    }
}
