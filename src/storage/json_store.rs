//! Durable prediction log backed by a single JSON file
//!
//! File layout:
//! ```json
//! { "predictions": [ ...PredictionRecord... ], "last_updated": "2024-03-01T10:00:00.000000" }
//! ```
//!
//! The whole file is rewritten on every append (write to a sibling temp file,
//! then rename), so a crash mid-write leaves the previous version intact.

use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{timestamps, PredictionLog, StorageError};
use crate::types::{now_iso8601, PredictionRecord};

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    predictions: Vec<PredictionRecord>,
    #[serde(default)]
    last_updated: Option<String>,
}

#[derive(Debug)]
pub struct JsonPredictionStore {
    path: PathBuf,
    predictions: Vec<PredictionRecord>,
}

impl JsonPredictionStore {
    /// Open the store at `path`, loading existing history if the file exists.
    ///
    /// A missing file starts an empty log. A malformed file is an error so
    /// that the next append cannot overwrite it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let predictions = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                let file: HistoryFile = serde_json::from_str(&contents)
                    .map_err(|source| StorageError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                tracing::debug!(last_updated = ?file.last_updated, "Loaded history file");
                file.predictions
            }
        } else {
            Vec::new()
        };

        tracing::info!(
            path = %path.display(),
            records = predictions.len(),
            "Prediction store opened"
        );

        Ok(Self { path, predictions })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record and persist the full log.
    ///
    /// On write failure the record is not retained in memory either.
    pub fn save_prediction(&mut self, record: PredictionRecord) -> Result<(), StorageError> {
        self.predictions.push(record);
        if let Err(e) = self.flush() {
            self.predictions.pop();
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist prediction");
            return Err(e);
        }
        Ok(())
    }

    pub fn all(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    /// Records stamped within the last `hours` hours.
    ///
    /// Stamps are compared as local wall-clock times, which is how this crate
    /// writes them. Records whose stamp cannot be parsed are skipped.
    pub fn recent(&self, hours: i64) -> Vec<&PredictionRecord> {
        let cutoff = Local::now().naive_local() - Duration::hours(hours);
        self.predictions
            .iter()
            .filter(|r| match timestamps::parse_lenient(&r.timestamp) {
                Some(ts) => ts >= cutoff,
                None => {
                    tracing::debug!(timestamp = %r.timestamp, "Skipping record with unparseable timestamp");
                    false
                }
            })
            .collect()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let file = HistoryFileRef {
            predictions: &self.predictions,
            last_updated: now_iso8601(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Borrowing twin of `HistoryFile` so flushing does not clone the log
#[derive(Serialize)]
struct HistoryFileRef<'a> {
    predictions: &'a [PredictionRecord],
    last_updated: String,
}

impl PredictionLog for JsonPredictionStore {
    fn append(&mut self, record: PredictionRecord) -> Result<(), StorageError> {
        self.save_prediction(record)
    }

    fn records(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn backend_name(&self) -> &'static str {
        "JsonFile"
    }
}
