//! Clock backed by the embassy time driver

use embassy_time::Delay;
use embedded_hal::delay::DelayNs;
use ranger_hal::{Clock, Instant};

/// Monotonic clock and blocking delay
///
/// Delays busy-wait; use `embassy_time::Timer` for anything long enough
/// to be worth yielding for.
pub struct EmbassyClock {
    delay: Delay,
}

impl Default for EmbassyClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbassyClock {
    /// Create a clock
    pub const fn new() -> Self {
        Self { delay: Delay }
    }
}

impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::from_micros(embassy_time::Instant::now().as_micros())
    }
}

impl DelayNs for EmbassyClock {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
