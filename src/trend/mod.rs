//! Trend Analyzer
//!
//! Replays the persisted prediction log over a date (and optionally
//! time-of-day) window and derives failure-rate trends, per-parameter
//! statistics, correlations and audience-specific insights.
//!
//! Everything is computed on demand from the records passed in; the
//! analyzer holds no state beyond its thresholds.

pub mod filter;
mod insights;
pub mod stats;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{self, TrendConfig};
use crate::sensors;
use crate::storage::timestamps::{self, TimestampError};
use crate::types::{
    CorrelationMatrix, ParameterSeries, PredictionRecord, RollingFailurePoint, Role, SeriesPoint,
    TrendDirection, TrendOutcome, TrendReport,
};

use insights::Series;
use stats::{mean, p_value_for_r, pearson, rolling_mean};

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("cannot parse prediction timestamps: {0}")]
    UnparseableTimestamp(#[from] TimestampError),
}

/// Whether the time-of-day bounds of a query apply
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeAnalysis {
    #[default]
    DailyOverview,
    WithinDay,
}

/// Window and parameter selection for one analysis run.
///
/// Only the listed `parameters` get series, statistics and correlations; an
/// empty list still yields the failure-rate figures. Dates and times are
/// local wall-clock values, matching how records are stamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub parameters: Vec<String>,
    pub time_analysis: TimeAnalysis,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendAnalyzer {
    /// Analyzer using the global `[trend]` config
    pub fn new() -> Self {
        Self::with_config(config::current().trend.clone())
    }

    pub fn with_config(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        records: &[PredictionRecord],
        query: &TrendQuery,
        role: Role,
    ) -> Result<TrendOutcome, TrendError> {
        if records.is_empty() {
            return Ok(TrendOutcome::NoData);
        }

        let raw: Vec<&str> = records.iter().map(|r| r.timestamp.as_str()).collect();
        let stamps = timestamps::parse_column(&raw)?;

        let filtered = filter::apply(records, &stamps, query);
        if filtered.is_empty() {
            tracing::info!(total = records.len(), "No predictions in the requested window");
            return Ok(TrendOutcome::NoData);
        }

        let window: Vec<&PredictionRecord> = filtered.iter().map(|(_, r)| *r).collect();
        let times: Vec<NaiveDateTime> = filtered.iter().map(|(ts, _)| *ts).collect();
        let failures: Vec<f64> = window
            .iter()
            .map(|r| if r.is_failure() { 1.0 } else { 0.0 })
            .collect();

        let series: Vec<Series<'_>> = query
            .parameters
            .iter()
            .map(|p| Series {
                parameter: p.as_str(),
                values: window.iter().map(|r| r.sensor_values.get(p).copied()).collect(),
            })
            .collect();

        let failure_count = window.iter().filter(|r| r.is_failure()).count();
        let failure_rate = failure_count as f64 / window.len() as f64;

        let mut role_specific_insights = insights::shift_insights(&failures, &series, &self.config);
        let findings = insights::analyze_parameters(&series, role, &self.config);
        role_specific_insights.extend(findings.parameter_recommendations);

        let report = TrendReport {
            total_predictions: window.len(),
            failure_count,
            failure_rate,
            trend_direction: self.direction(&failures),
            parameter_series: parameter_series(&series, &times),
            correlation: correlation_matrix(&series),
            rolling_failure_rate: self.rolling(&failures, &times, &window),
            role_specific_insights,
            detailed_analysis: findings.detailed,
        };

        tracing::debug!(
            predictions = report.total_predictions,
            failure_rate = report.failure_rate,
            direction = ?report.trend_direction,
            critical_issues = report.detailed_analysis.critical_issues.len(),
            "Trend analysis complete"
        );

        Ok(TrendOutcome::Success(Box::new(report)))
    }

    /// Tail window failure rate against the head window
    fn direction(&self, failures: &[f64]) -> TrendDirection {
        let n = self.config.direction_window.min(failures.len());
        let head = mean(&failures[..n]);
        let tail = mean(&failures[failures.len() - n..]);
        if tail > head {
            TrendDirection::Deteriorating
        } else {
            TrendDirection::Improving
        }
    }

    fn rolling(
        &self,
        failures: &[f64],
        times: &[NaiveDateTime],
        window: &[&PredictionRecord],
    ) -> Vec<RollingFailurePoint> {
        rolling_mean(failures, self.config.rolling_window)
            .into_iter()
            .zip(times.iter().zip(window.iter()))
            .map(|(rolling_failure_rate, (timestamp, record))| RollingFailurePoint {
                timestamp: *timestamp,
                failure: u8::from(record.is_failure()),
                rolling_failure_rate,
            })
            .collect()
    }
}

fn parameter_series(series: &[Series<'_>], times: &[NaiveDateTime]) -> Vec<ParameterSeries> {
    series
        .iter()
        .map(|s| {
            let range = sensors::range(s.parameter);
            ParameterSeries {
                parameter: s.parameter.to_string(),
                points: times
                    .iter()
                    .zip(s.values.iter())
                    .map(|(timestamp, value)| SeriesPoint {
                        timestamp: *timestamp,
                        value: *value,
                    })
                    .collect(),
                critical_high: range.map(|r| r.critical_high),
                critical_low: range.map(|r| r.critical_low),
            }
        })
        .collect()
}

fn correlation_matrix(series: &[Series<'_>]) -> CorrelationMatrix {
    let mut values = Vec::with_capacity(series.len());
    let mut p_values = Vec::with_capacity(series.len());

    for a in series {
        let mut row = Vec::with_capacity(series.len());
        let mut p_row = Vec::with_capacity(series.len());
        for b in series {
            match pearson(&a.values, &b.values) {
                Some((r, n)) => {
                    row.push(Some(r));
                    p_row.push(p_value_for_r(r, n));
                }
                None => {
                    row.push(None);
                    p_row.push(None);
                }
            }
        }
        values.push(row);
        p_values.push(p_row);
    }

    CorrelationMatrix {
        parameters: series.iter().map(|s| s.parameter.to_string()).collect(),
        values,
        p_values,
    }
}
