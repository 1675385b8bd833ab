//! Indicator LED
//!
//! Wraps a GPIO so the control loop can switch it by logical state
//! (lit/unlit) regardless of how the LED is wired.

use ranger_hal::OutputPin;

/// LED on a GPIO, optionally active-low
pub struct Indicator<P> {
    pin: P,
    /// If true, LED on = pin LOW
    inverted: bool,
    /// Current logical state (true = lit)
    on: bool,
}

impl<P: OutputPin> Indicator<P> {
    /// Create an indicator; it starts off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut indicator = Self {
            pin,
            inverted,
            on: false,
        };
        indicator.set_on(false);
        indicator
    }

    /// Switch the LED
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
        // Normal: on -> high. Inverted: on -> low
        self.pin.set_state(on != self.inverted);
    }

    /// Check if the LED is lit
    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Logical levels: high = lit
impl<P: OutputPin> OutputPin for Indicator<P> {
    fn set_high(&mut self) {
        self.set_on(true);
    }

    fn set_low(&mut self) {
        self.set_on(false);
    }

    fn is_set_high(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranger_hal::mock::MockPin;

    #[test]
    fn test_starts_off() {
        let pin = MockPin::with_level(true);
        let indicator = Indicator::new(pin.clone(), false);
        assert!(!indicator.is_on());
        assert!(!pin.level());

        let pin = MockPin::new();
        let _indicator = Indicator::new(pin.clone(), true);
        assert!(pin.level());
    }

    #[test]
    fn test_active_high() {
        let pin = MockPin::new();
        let mut indicator = Indicator::new(pin.clone(), false);

        indicator.set_high();
        assert!(pin.level());
        assert!(indicator.is_set_high());

        indicator.set_low();
        assert!(!pin.level());
    }

    #[test]
    fn test_active_low() {
        let pin = MockPin::new();
        let mut indicator = Indicator::new(pin.clone(), true);

        indicator.set_on(true);
        assert!(!pin.level());
        assert!(indicator.is_on());

        indicator.set_on(false);
        assert!(pin.level());
    }
}
