//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use ranger_core::control::LoopStats;
use ranger_core::traits::ShutdownSignal;

/// Raised once to stop the control loop (shutdown button or other source)
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Final counters, published after the control loop has released the hardware
pub static STOPPED: Signal<CriticalSectionRawMutex, LoopStats> = Signal::new();

/// Non-consuming view of [`SHUTDOWN`] for the control loop
pub struct ShutdownRequest;

impl ShutdownSignal for ShutdownRequest {
    fn is_requested(&self) -> bool {
        SHUTDOWN.signaled()
    }
}
