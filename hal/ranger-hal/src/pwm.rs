//! PWM output abstraction
//!
//! One [`PwmChannel`] is one output pin driven at a fixed carrier
//! frequency. The carrier is chosen once when the channel is started;
//! afterwards only the duty cycle changes.

/// Errors reported by PWM channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Requested carrier frequency cannot be generated
    UnsupportedFrequency,
    /// Channel has not been started
    NotRunning,
    /// Hardware rejected the duty update
    Hardware,
}

/// Fixed-frequency PWM output
pub trait PwmChannel {
    /// Start the carrier at `frequency_hz` with 0% duty
    fn start(&mut self, frequency_hz: u32) -> Result<(), PwmError>;

    /// Set the duty cycle in percent (0.0 - 100.0)
    ///
    /// Values outside the range are clamped by the implementation.
    fn set_duty_percent(&mut self, duty: f32) -> Result<(), PwmError>;

    /// Stop the carrier; the output idles low
    fn stop(&mut self);

    /// Check whether the carrier is running
    fn is_running(&self) -> bool;
}
