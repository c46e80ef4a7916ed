//! Bounded in-memory prediction log

use super::{PredictionLog, StorageError};
use crate::types::PredictionRecord;

/// In-memory log with optional FIFO eviction.
///
/// Not durable; history is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLog {
    records: Vec<PredictionRecord>,
    capacity: Option<usize>,
}

impl InMemoryLog {
    /// Log that keeps only the most recent `capacity` records
    pub fn bounded(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity.min(4096)),
            capacity: Some(capacity),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }
}

impl PredictionLog for InMemoryLog {
    fn append(&mut self, record: PredictionRecord) -> Result<(), StorageError> {
        self.records.push(record);

        // Evict oldest if over limit
        if let Some(cap) = self.capacity {
            if self.records.len() > cap {
                let excess = self.records.len() - cap;
                self.records.drain(..excess);
            }
        }

        Ok(())
    }

    fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}
