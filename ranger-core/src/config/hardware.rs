//! Hardware configuration types
//!
//! These types define pin assignments and loop tuning for the robot.

use heapless::FnvIndexSet;

use crate::motion::MOTOR_COUNT;
use crate::safety::DEFAULT_THRESHOLD_CM;
use crate::state::{DemoClockPolicy, BUTTON_COUNT};

/// Number of GPIO pins (RP2040)
pub const GPIO_COUNT: u8 = 30;

/// Default PWM carrier frequency for the motor drivers
pub const DEFAULT_PWM_FREQUENCY_HZ: u32 = 1000;

/// Default delay between control cycles
pub const DEFAULT_LOOP_DELAY_MS: u32 = 50;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Active-low button to ground with pull-up
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin number out of range
    InvalidPin(u8),
    /// Same pin assigned twice
    DuplicatePin(u8),
    /// Safety threshold must be positive
    InvalidThreshold,
    /// PWM frequency must be non-zero
    InvalidFrequency,
    /// Loop delay must be non-zero
    InvalidLoopDelay,
}

/// Complete robot configuration
///
/// `None` pins are not fitted; the matching component skips hardware
/// access and reports a safe default.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RobotConfig {
    /// Single-wire ultrasonic ranger (trigger and echo share the pin)
    pub sensor_pin: Option<PinConfig>,
    /// Mode buttons in priority order: Fast, Slow, Stop, Demo
    pub button_pins: [Option<PinConfig>; BUTTON_COUNT],
    /// Drive motor PWM outputs, M1..M4
    pub motor_pins: [Option<PinConfig>; MOTOR_COUNT],
    /// Obstacle indicator LED
    pub indicator_pin: Option<PinConfig>,
    /// Optional button that requests shutdown
    pub shutdown_pin: Option<PinConfig>,
    /// Stopping distance
    pub safety_threshold_cm: f32,
    /// Motor PWM carrier frequency
    pub pwm_frequency_hz: u32,
    /// Delay between control cycles
    pub loop_delay_ms: u32,
    /// Demo time behaviour during a safety override
    pub demo_clock: DemoClockPolicy,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            sensor_pin: Some(PinConfig::new(7)),
            button_pins: [
                Some(PinConfig::button(8)),
                Some(PinConfig::button(9)),
                Some(PinConfig::button(10)),
                Some(PinConfig::button(12)),
            ],
            motor_pins: [
                Some(PinConfig::new(3)),
                Some(PinConfig::new(5)),
                Some(PinConfig::new(6)),
                Some(PinConfig::new(11)),
            ],
            indicator_pin: Some(PinConfig::new(0)),
            shutdown_pin: None,
            safety_threshold_cm: DEFAULT_THRESHOLD_CM,
            pwm_frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
            loop_delay_ms: DEFAULT_LOOP_DELAY_MS,
            demo_clock: DemoClockPolicy::FreeRunning,
        }
    }
}

impl RobotConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Every assigned pin, in declaration order
    pub fn assigned_pins(&self) -> impl Iterator<Item = PinConfig> + '_ {
        self.sensor_pin
            .iter()
            .chain(self.button_pins.iter().flatten())
            .chain(self.motor_pins.iter().flatten())
            .chain(self.indicator_pin.iter())
            .chain(self.shutdown_pin.iter())
            .copied()
    }

    /// Check pin ranges, pin conflicts and tuning values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut used: FnvIndexSet<u8, 32> = FnvIndexSet::new();

        for pin in self.assigned_pins() {
            if pin.pin >= GPIO_COUNT {
                return Err(ConfigError::InvalidPin(pin.pin));
            }
            match used.insert(pin.pin) {
                Ok(true) => {}
                Ok(false) => return Err(ConfigError::DuplicatePin(pin.pin)),
                Err(_) => return Err(ConfigError::InvalidPin(pin.pin)),
            }
        }

        if self.safety_threshold_cm.is_nan() || self.safety_threshold_cm <= 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.pwm_frequency_hz == 0 {
            return Err(ConfigError::InvalidFrequency);
        }
        if self.loop_delay_ms == 0 {
            return Err(ConfigError::InvalidLoopDelay);
        }

        Ok(())
    }
}
