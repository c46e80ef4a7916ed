//! Prediction history storage
//!
//! Two append-only backends behind one trait:
//! - `InMemoryLog`: bounded FIFO used by the operational monitor
//! - `JsonPredictionStore`: unbounded, durable JSON file used for trend analysis
//!
//! The two are independent. Nothing merges them; a caller that wants both
//! appends to both.

pub mod json_store;
pub mod memory;
pub mod timestamps;

pub use json_store::JsonPredictionStore;
pub use memory::InMemoryLog;

use std::path::PathBuf;
use thiserror::Error;

use crate::types::PredictionRecord;

/// Append-only log of prediction records, oldest first.
pub trait PredictionLog {
    /// Append one record, evicting the oldest entries if a capacity is set
    fn append(&mut self, record: PredictionRecord) -> Result<(), StorageError>;

    /// All retained records in insertion order
    fn records(&self) -> &[PredictionRecord];

    /// Maximum retained records, or None when unbounded
    fn capacity(&self) -> Option<usize>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// The last `n` records (fewer if the log is shorter)
    fn tail(&self, n: usize) -> &[PredictionRecord] {
        let records = self.records();
        &records[records.len().saturating_sub(n)..]
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed history file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
