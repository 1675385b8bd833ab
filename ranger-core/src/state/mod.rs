//! Operating modes
//!
//! The mode is chosen from the buttons every cycle; the demo phase is a
//! pure function of elapsed time. Neither is stored anywhere else.

pub mod demo;
pub mod mode;

pub use demo::{DemoClock, DemoClockPolicy, DemoPhase};
pub use mode::{Mode, BUTTON_COUNT};
