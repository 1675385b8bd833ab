//! Monotonic time and bounded waits
//!
//! Time is kept as microseconds since an arbitrary epoch (boot on target,
//! zero in tests). Sleeping goes through `embedded_hal::delay::DelayNs`, so
//! any clock is also a delay provider.

use embedded_hal::delay::DelayNs;

/// Point in time, microsecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant {
    micros: u64,
}

impl Instant {
    /// Create an instant from microseconds since the epoch
    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    /// Create an instant from milliseconds since the epoch
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            micros: millis * 1000,
        }
    }

    /// Microseconds since the epoch
    pub const fn as_micros(&self) -> u64 {
        self.micros
    }

    /// Microseconds elapsed since `earlier`, zero if `earlier` is later
    pub const fn micros_since(&self, earlier: Instant) -> u64 {
        self.micros.saturating_sub(earlier.micros)
    }

    /// This instant shifted forward by `micros`
    pub const fn plus_micros(&self, micros: u64) -> Self {
        Self {
            micros: self.micros.saturating_add(micros),
        }
    }
}

/// Monotonic clock
///
/// `now()` must never go backwards. Sleeping uses the `DelayNs` supertrait.
pub trait Clock: DelayNs {
    /// Current time
    fn now(&self) -> Instant;
}

/// Absolute point after which a wait gives up
///
/// Computed once when the wait starts and compared on every poll, so a
/// slow poll body can never stretch the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout_us` after `start`
    pub const fn after(start: Instant, timeout_us: u64) -> Self {
        Self {
            at: start.plus_micros(timeout_us),
        }
    }

    /// The instant the deadline expires
    pub const fn at(&self) -> Instant {
        self.at
    }

    /// True once `now` is strictly past the deadline
    pub fn has_passed(&self, now: Instant) -> bool {
        now > self.at
    }
}

/// A bounded wait expired before its condition held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut;

/// Busy-poll `condition` until it holds or `deadline` passes
///
/// Returns the instant at which the condition was first observed true.
pub fn wait_until<C, F>(clock: &C, deadline: Deadline, mut condition: F) -> Result<Instant, TimedOut>
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    loop {
        if condition() {
            return Ok(clock.now());
        }
        if deadline.has_passed(clock.now()) {
            return Err(TimedOut);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_arithmetic() {
        let a = Instant::from_millis(2);
        assert_eq!(a.as_micros(), 2000);
        assert_eq!(a.plus_micros(500).as_micros(), 2500);
        assert_eq!(a.plus_micros(500).micros_since(a), 500);
        // Saturates rather than wrapping
        assert_eq!(a.micros_since(a.plus_micros(1)), 0);
    }

    #[test]
    fn test_deadline_is_strict() {
        let start = Instant::from_micros(100);
        let deadline = Deadline::after(start, 30_000);
        assert_eq!(deadline.at(), Instant::from_micros(30_100));
        assert!(!deadline.has_passed(Instant::from_micros(30_100)));
        assert!(deadline.has_passed(Instant::from_micros(30_101)));
    }
}
