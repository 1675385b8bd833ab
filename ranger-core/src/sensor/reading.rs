//! Distance readings and echo-to-distance conversion

/// Speed of sound at room temperature
pub const SPEED_OF_SOUND_CM_PER_S: f32 = 34_300.0;

/// Line held low before the trigger pulse
pub const SETTLE_US: u32 = 2;

/// Trigger pulse width
pub const TRIGGER_PULSE_US: u32 = 5;

/// Bound on each of the two echo waits (rise, then fall)
pub const ECHO_TIMEOUT_US: u64 = 30_000;

/// Result of one ranging cycle
///
/// `valid == false` means the sensor did not answer in time (or is not
/// fitted); the control loop treats that as "no obstacle".
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceReading {
    /// Distance in centimetres (meaningless when `valid` is false)
    pub value_cm: f32,
    /// Measurement completed
    pub valid: bool,
}

impl DistanceReading {
    /// Completed measurement
    pub const fn valid(value_cm: f32) -> Self {
        Self {
            value_cm,
            valid: true,
        }
    }

    /// Timed out or unconfigured sensor
    pub const fn timeout() -> Self {
        Self {
            value_cm: 0.0,
            valid: false,
        }
    }

    /// Distance if the measurement completed
    pub fn distance_cm(&self) -> Option<f32> {
        self.valid.then_some(self.value_cm)
    }
}

impl From<Result<f32, RangingError>> for DistanceReading {
    fn from(result: Result<f32, RangingError>) -> Self {
        match result {
            Ok(cm) => Self::valid(cm),
            Err(_) => Self::timeout(),
        }
    }
}

/// Why a ranging cycle produced no distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingError {
    /// No sensor pin configured
    Unconfigured,
    /// Echo line never rose (nothing in range)
    NoEcho,
    /// Echo line rose but never fell
    EchoStuckHigh,
}

/// Convert an echo pulse width to distance
///
/// The pulse covers the round trip, so the distance is half the path.
/// Non-positive widths pass straight through as non-positive distances.
pub fn echo_to_cm(echo_us: i64) -> f32 {
    (echo_us as f32 / 1_000_000.0) * SPEED_OF_SOUND_CM_PER_S / 2.0
}
