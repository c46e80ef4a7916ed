//! Monitor Configuration Module
//!
//! Replaces the hardcoded scoring, drift and trend thresholds with
//! operator-tunable TOML values.
//!
//! ## Loading Order
//!
//! 1. `APU_CONFIG` environment variable (path to TOML file)
//! 2. `apu_monitor.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! config::init(MonitorConfig::load());
//! let window = config::current().monitor.drift_window;
//! ```
//!
//! Components also accept an explicit config through `with_config`, which
//! is what the tests use.

mod monitor_config;
pub mod defaults;
pub mod validation;

pub use monitor_config::*;

use std::sync::OnceLock;

static MONITOR_CONFIG: OnceLock<MonitorConfig> = OnceLock::new();

static DEFAULT_CONFIG: OnceLock<MonitorConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored.
pub fn init(config: MonitorConfig) {
    for w in validation::validate_plausibility(&config) {
        tracing::warn!("{}", w);
    }
    if MONITOR_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// The global configuration, if `init()` has run.
fn get() -> Option<&'static MonitorConfig> {
    MONITOR_CONFIG.get()
}

/// The global configuration, or the built-in defaults before `init()`.
pub fn current() -> &'static MonitorConfig {
    get().unwrap_or_else(|| DEFAULT_CONFIG.get_or_init(MonitorConfig::default))
}
