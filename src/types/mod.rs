//! Shared data structures for APU predictive maintenance
//!
//! - `role`: audience personas that select recommendation phrasing
//! - `quality`: per-snapshot data-quality results and alerts
//! - `prediction`: oracle output and the logged/persisted prediction record
//! - `reports`: drift, health and trend reports computed from history

mod prediction;
mod quality;
mod reports;
mod role;

pub use prediction::*;
pub use quality::*;
pub use reports::*;
pub use role::*;
