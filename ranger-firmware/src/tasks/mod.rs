//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod control;
pub mod shutdown;

pub use control::control_task;
pub use shutdown::{shutdown_task, ShutdownButton};
