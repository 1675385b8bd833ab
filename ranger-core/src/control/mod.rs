//! Control loop
//!
//! One cycle reads the mode buttons, takes a distance reading, applies the
//! safety override and drives the motors. The loop owns every component
//! and tears them down exactly once when it stops.

pub mod control_loop;

pub use control_loop::{ControlLoop, CycleReport, LoopPhase, LoopStats};
