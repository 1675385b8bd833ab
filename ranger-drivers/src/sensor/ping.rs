//! Single-wire ultrasonic ranger
//!
//! Three-pin "ping" style sensors share one line for trigger and echo:
//!
//! 1. Drive the line low for 2µs so the trigger edge is clean
//! 2. Drive it high for 5µs (trigger)
//! 3. Release it as an input and time the echo pulse
//!
//! Each of the two echo waits (line rises, line falls) gives up after
//! 30ms, so a silent or stuck sensor costs at most ~60ms per cycle.
//!
//! ```ignore
//! let mut sensor = PingSensor::new(pin, clock);
//! match sensor.ping() {
//!     Ok(cm) => info!("{} cm", cm),
//!     Err(e) => warn!("no reading: {:?}", e),
//! }
//! ```

use ranger_core::sensor::{
    echo_to_cm, DistanceReading, RangingError, ECHO_TIMEOUT_US, SETTLE_US, TRIGGER_PULSE_US,
};
use ranger_core::traits::DistanceSensor;
use ranger_hal::{wait_until, Clock, Deadline, FlexPin, PinMode, Pull};

/// Ultrasonic ranger on one bidirectional pin
pub struct PingSensor<P, C> {
    /// `None` when no sensor is fitted
    pin: Option<P>,
    clock: C,
    /// Bound on each echo wait
    timeout_us: u64,
}

impl<P: FlexPin, C: Clock> PingSensor<P, C> {
    /// Create a sensor on `pin`
    pub fn new(pin: P, clock: C) -> Self {
        Self {
            pin: Some(pin),
            clock,
            timeout_us: ECHO_TIMEOUT_US,
        }
    }

    /// Create a sensor with no pin; every reading is invalid
    pub fn unconfigured(clock: C) -> Self {
        Self {
            pin: None,
            clock,
            timeout_us: ECHO_TIMEOUT_US,
        }
    }

    /// Override the per-wait echo timeout
    pub fn with_timeout_us(mut self, timeout_us: u64) -> Self {
        self.timeout_us = timeout_us;
        self
    }

    /// Check if a pin is assigned
    pub fn is_configured(&self) -> bool {
        self.pin.is_some()
    }

    /// Run one trigger/echo cycle and return the distance in cm
    pub fn ping(&mut self) -> Result<f32, RangingError> {
        let Self {
            pin,
            clock,
            timeout_us,
        } = self;
        let pin = pin.as_mut().ok_or(RangingError::Unconfigured)?;

        // Trigger
        pin.configure(PinMode::Output);
        pin.set_low();
        clock.delay_us(SETTLE_US);
        pin.set_high();
        clock.delay_us(TRIGGER_PULSE_US);
        pin.set_low();

        // Listen
        pin.configure(PinMode::Input(Pull::None));
        let listening = clock.now();

        let rise = wait_until(&*clock, Deadline::after(listening, *timeout_us), || {
            pin.is_high()
        })
        .map_err(|_| RangingError::NoEcho)?;

        let fall = wait_until(&*clock, Deadline::after(rise, *timeout_us), || pin.is_low())
            .map_err(|_| RangingError::EchoStuckHigh)?;

        let echo_us = fall.as_micros() as i64 - rise.as_micros() as i64;
        Ok(echo_to_cm(echo_us))
    }
}

impl<P: FlexPin, C: Clock> DistanceSensor for PingSensor<P, C> {
    fn measure(&mut self) -> DistanceReading {
        let result = self.ping();
        if let Err(e) = result {
            ranger_core::log_debug!("Ranging failed: {:?}", e);
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranger_hal::mock::{MockClock, MockEchoPin, MockPin, PinEvent};
    use ranger_hal::Instant;

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_trigger_sequence() {
        let clock = MockClock::new();
        let pin = MockEchoPin::at_distance(&clock, 50.0);
        let mut sensor = PingSensor::new(pin.clone(), clock.clone());

        sensor.ping().unwrap();

        let timeline = pin.timeline();
        let events: Vec<PinEvent> = timeline.iter().map(|(_, e)| *e).collect();
        assert_eq!(
            events,
            vec![
                PinEvent::Configured(PinMode::Output),
                PinEvent::Write(false),
                PinEvent::Write(true),
                PinEvent::Write(false),
                PinEvent::Configured(PinMode::Input(Pull::None)),
            ]
        );

        // 2µs settle, 5µs trigger
        let at = |i: usize| timeline[i].0.as_micros();
        assert_eq!(at(2) - at(1), 2);
        assert_eq!(at(3) - at(2), 5);
    }

    #[test]
    fn test_distance_from_echo() {
        let clock = MockClock::new();
        for cm in [5.0f32, 20.0, 100.0, 300.0] {
            let pin = MockEchoPin::at_distance(&clock, cm);
            let mut sensor = PingSensor::new(pin, clock.clone());
            let reading = sensor.measure();
            assert!(reading.valid);
            assert!(approx(reading.value_cm, cm, 0.1), "{} vs {}", reading.value_cm, cm);
        }
    }

    #[test]
    fn test_silent_sensor_times_out_once() {
        let clock = MockClock::new();
        let mut sensor = PingSensor::new(MockEchoPin::silent(&clock), clock.clone());

        let start = clock.peek();
        assert_eq!(sensor.ping(), Err(RangingError::NoEcho));
        let waited = clock.peek().micros_since(start);

        assert!(waited >= ECHO_TIMEOUT_US);
        assert!(waited <= ECHO_TIMEOUT_US + 100, "waited {}µs", waited);
    }

    #[test]
    fn test_stuck_high_bounded() {
        let clock = MockClock::new();
        let pin = MockEchoPin::new(&clock, Some(50), None);
        let mut sensor = PingSensor::new(pin, clock.clone());

        let start = clock.peek();
        assert_eq!(sensor.ping(), Err(RangingError::EchoStuckHigh));
        let waited = clock.peek().micros_since(start);

        assert!(waited >= ECHO_TIMEOUT_US + 50);
        assert!(waited <= 2 * ECHO_TIMEOUT_US + 100);
    }

    #[test]
    fn test_unconfigured_is_invalid_and_instant() {
        let clock = MockClock::new();
        let mut sensor: PingSensor<MockPin, _> = PingSensor::unconfigured(clock.clone());

        assert!(!sensor.is_configured());
        assert_eq!(sensor.measure(), DistanceReading::timeout());
        assert_eq!(clock.peek(), Instant::from_micros(0));
    }

    #[test]
    fn test_custom_timeout() {
        let clock = MockClock::new();
        let mut sensor =
            PingSensor::new(MockEchoPin::silent(&clock), clock.clone()).with_timeout_us(1_000);

        let start = clock.peek();
        assert!(!sensor.measure().valid);
        assert!(clock.peek().micros_since(start) < 1_200);
    }

    #[test]
    fn test_next_cycle_resamples() {
        let clock = MockClock::new();
        let pin = MockEchoPin::silent(&clock);
        let mut sensor = PingSensor::new(pin.clone(), clock.clone());

        assert!(!sensor.measure().valid);

        pin.set_distance(40.0);
        let reading = sensor.measure();
        assert!(reading.valid);
        assert!(approx(reading.value_cm, 40.0, 0.1));
    }
}
