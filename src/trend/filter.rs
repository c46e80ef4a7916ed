//! Date and time-of-day filtering of the persisted log

use chrono::NaiveDateTime;

use super::{TimeAnalysis, TrendQuery};
use crate::types::PredictionRecord;

/// Records passing the query's date and time-of-day filters, log order kept.
///
/// Date bounds are inclusive and compare the date part only. The
/// time-of-day window applies only to within-day analysis with both ends
/// given, and is inclusive.
pub fn apply<'a>(
    records: &'a [PredictionRecord],
    stamps: &[NaiveDateTime],
    query: &TrendQuery,
) -> Vec<(NaiveDateTime, &'a PredictionRecord)> {
    let time_window = match (query.time_analysis, query.start_time, query.end_time) {
        (TimeAnalysis::WithinDay, Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };

    stamps
        .iter()
        .copied()
        .zip(records.iter())
        .filter(|(ts, _)| query.start_date.map_or(true, |d| ts.date() >= d))
        .filter(|(ts, _)| query.end_date.map_or(true, |d| ts.date() <= d))
        .filter(|(ts, _)| {
            time_window.map_or(true, |(start, end)| ts.time() >= start && ts.time() <= end)
        })
        .collect()
}
