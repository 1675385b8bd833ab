//! Component traits
//!
//! These traits define the interface between the control loop and the
//! hardware-backed components in `ranger-drivers`.

pub mod input;
pub mod motion;
pub mod sensor;
pub mod shutdown;

pub use input::ModeSelector;
pub use motion::MotionController;
pub use sensor::DistanceSensor;
pub use shutdown::ShutdownSignal;
