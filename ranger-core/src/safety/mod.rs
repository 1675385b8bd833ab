//! Safety monitoring
//!
//! Detects obstacles inside the stopping distance and forces the drive to
//! stop, whatever mode is selected.

pub mod monitor;

pub use monitor::{SafetyMonitor, SafetyStatus, DEFAULT_THRESHOLD_CM};
