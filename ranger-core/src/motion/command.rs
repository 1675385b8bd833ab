//! Speed scale, motor channels and motion commands

/// Number of drive motors
pub const MOTOR_COUNT: usize = 4;

/// Top of the speed scale (100% duty)
pub const MAX_VALUE: i32 = 255;

/// Speed used by the Fast preset
pub const FAST_VALUE: i32 = 255;

/// Speed used by the Slow preset (~47% duty)
pub const SLOW_VALUE: i32 = 120;

/// Drive motor channel
///
/// [`MotorChannel::ALL`] is the order every "all motors" operation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorChannel {
    M1,
    M2,
    M3,
    M4,
}

impl MotorChannel {
    /// All channels in application order
    pub const ALL: [MotorChannel; MOTOR_COUNT] = [
        MotorChannel::M1,
        MotorChannel::M2,
        MotorChannel::M3,
        MotorChannel::M4,
    ];

    /// Zero-based index
    pub const fn index(self) -> usize {
        match self {
            MotorChannel::M1 => 0,
            MotorChannel::M2 => 1,
            MotorChannel::M3 => 2,
            MotorChannel::M4 => 3,
        }
    }
}

/// What the drive should do this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionCommand {
    /// All motors at 0
    Stop,
    /// All motors at [`FAST_VALUE`]
    Fast,
    /// All motors at [`SLOW_VALUE`]
    Slow,
}

impl MotionCommand {
    /// Speed value written to every motor
    pub const fn value(self) -> i32 {
        match self {
            MotionCommand::Stop => 0,
            MotionCommand::Fast => FAST_VALUE,
            MotionCommand::Slow => SLOW_VALUE,
        }
    }

    /// Duty every motor ends up at
    pub fn duty_percent(self) -> f32 {
        value_to_duty(self.value())
    }
}

/// Clamp a speed to 0..=255 and convert to duty percent
pub fn value_to_duty(value: i32) -> f32 {
    let value = value.clamp(0, MAX_VALUE);
    value as f32 / MAX_VALUE as f32 * 100.0
}
