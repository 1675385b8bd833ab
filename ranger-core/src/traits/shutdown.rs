//! Cancellation signal

use core::sync::atomic::{AtomicBool, Ordering};

/// External request to stop the control loop
pub trait ShutdownSignal {
    /// Check whether shutdown has been requested
    fn is_requested(&self) -> bool;
}

impl ShutdownSignal for AtomicBool {
    fn is_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}
