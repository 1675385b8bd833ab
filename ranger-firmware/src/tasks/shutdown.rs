//! Shutdown button task
//!
//! Waits for the optional stop button, raises [`SHUTDOWN`] and reports
//! once the control loop has released the hardware.

use defmt::*;
use embassy_time::Timer;

use ranger_hal::InputPin;
use ranger_hal_rp2040::RpInput;

use crate::channels::{SHUTDOWN, STOPPED};

/// Press must still be held after this long to count
const DEBOUNCE_MS: u64 = 20;

/// Stop button
pub struct ShutdownButton {
    pub pin: RpInput,
    /// Pressed reads low
    pub active_low: bool,
}

impl ShutdownButton {
    fn is_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }

    async fn wait_for_press(&mut self) {
        if self.active_low {
            self.pin.wait_for_low().await;
        } else {
            self.pin.wait_for_high().await;
        }
    }
}

/// Shutdown button task
#[embassy_executor::task]
pub async fn shutdown_task(mut button: ShutdownButton) {
    info!("Shutdown button armed");

    loop {
        button.wait_for_press().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_pressed() {
            break;
        }
    }

    info!("Shutdown requested");
    SHUTDOWN.signal(());

    let stats = STOPPED.wait().await;
    info!("Motors released after {} cycles, safe to power off", stats.cycles);
}
