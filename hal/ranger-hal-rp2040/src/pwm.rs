//! PWM slice channels
//!
//! The RP2040 has eight PWM slices, each with an A and a B output. A
//! [`SliceChannel`] drives one output of one slice; the other output of
//! that slice is left unused, so the carrier frequency of each channel
//! can be set independently.
//!
//! Carrier frequency is `clk_sys / (divider * (top + 1))`. The divider is
//! 8.4 fixed point (1.0 to 255.9375).

use embassy_rp::pwm::{Config, Pwm};
use fixed::types::U12F4;
use ranger_hal::{PwmChannel, PwmError};

/// Largest usable `top + 1`, leaving headroom for a 100% compare value
const MAX_COUNT: u64 = 65_535;

/// Divider 1.0 in 1/16 steps
const MIN_DIVIDER_16THS: u64 = 16;

/// Divider 255.9375 in 1/16 steps
const MAX_DIVIDER_16THS: u64 = 255 * 16 + 15;

/// Which output of the slice a channel drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SliceOutput {
    A,
    B,
}

/// Divider and wrap value for one carrier frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    /// Clock divider in 1/16 steps (8.4 fixed point bits)
    pub divider_16ths: u16,
    /// Counter wrap value
    pub top: u16,
}

impl PwmTiming {
    /// Pick the smallest divider that fits `frequency_hz`, for the best
    /// duty resolution
    pub fn for_frequency(sys_clk_hz: u32, frequency_hz: u32) -> Result<Self, PwmError> {
        if frequency_hz == 0 {
            return Err(PwmError::UnsupportedFrequency);
        }

        let clk_16ths = sys_clk_hz as u64 * 16;
        let freq = frequency_hz as u64;

        let divider = clk_16ths
            .div_ceil(freq * MAX_COUNT)
            .max(MIN_DIVIDER_16THS);
        if divider > MAX_DIVIDER_16THS {
            return Err(PwmError::UnsupportedFrequency);
        }

        let count = clk_16ths / (divider * freq);
        if count < 2 {
            return Err(PwmError::UnsupportedFrequency);
        }

        Ok(Self {
            divider_16ths: divider as u16,
            top: (count - 1) as u16,
        })
    }

    /// Carrier frequency this timing actually produces
    pub fn frequency_hz(&self, sys_clk_hz: u32) -> u32 {
        let period = self.divider_16ths as u64 * (self.top as u64 + 1);
        (sys_clk_hz as u64 * 16 / period) as u32
    }

    /// Compare value for `duty` percent (clamped to 0-100)
    pub fn compare_for(&self, duty: f32) -> u16 {
        let duty = duty.clamp(0.0, 100.0);
        let count = self.top as f32 + 1.0;
        (count * duty / 100.0) as u16
    }
}

/// One PWM output implementing [`PwmChannel`]
pub struct SliceChannel {
    pwm: Pwm<'static>,
    output: SliceOutput,
    config: Config,
    /// `Some` while the carrier runs
    timing: Option<PwmTiming>,
}

impl SliceChannel {
    /// Wrap a slice configured for a single output
    ///
    /// The slice is disabled until [`PwmChannel::start`].
    pub fn new(mut pwm: Pwm<'static>, output: SliceOutput) -> Self {
        let mut config = Config::default();
        config.enable = false;
        config.compare_a = 0;
        config.compare_b = 0;
        pwm.set_config(&config);

        Self {
            pwm,
            output,
            config,
            timing: None,
        }
    }

    fn set_compare(&mut self, compare: u16) {
        match self.output {
            SliceOutput::A => self.config.compare_a = compare,
            SliceOutput::B => self.config.compare_b = compare,
        }
    }
}

impl PwmChannel for SliceChannel {
    fn start(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        let timing = PwmTiming::for_frequency(embassy_rp::clocks::clk_sys_freq(), frequency_hz)?;

        self.config.divider = U12F4::from_bits(timing.divider_16ths);
        self.config.top = timing.top;
        self.set_compare(0);
        self.config.enable = true;
        self.pwm.set_config(&self.config);
        self.timing = Some(timing);
        Ok(())
    }

    fn set_duty_percent(&mut self, duty: f32) -> Result<(), PwmError> {
        let timing = self.timing.ok_or(PwmError::NotRunning)?;
        self.set_compare(timing.compare_for(duty));
        self.pwm.set_config(&self.config);
        Ok(())
    }

    fn stop(&mut self) {
        self.set_compare(0);
        self.config.enable = false;
        self.pwm.set_config(&self.config);
        self.timing = None;
    }

    fn is_running(&self) -> bool {
        self.timing.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYS_CLK: u32 = 125_000_000;

    #[test]
    fn test_timing_1khz() {
        let timing = PwmTiming::for_frequency(SYS_CLK, 1000).unwrap();
        assert_eq!(timing.divider_16ths, 31);
        assert_eq!(timing.top, 64_515);
        assert_eq!(timing.frequency_hz(SYS_CLK), 1000);
    }

    #[test]
    fn test_timing_high_frequency_uses_unit_divider() {
        let timing = PwmTiming::for_frequency(SYS_CLK, 20_000).unwrap();
        assert_eq!(timing.divider_16ths, 16);
        assert_eq!(timing.top, 6249);
        assert_eq!(timing.frequency_hz(SYS_CLK), 20_000);
    }

    #[test]
    fn test_timing_out_of_range() {
        assert_eq!(
            PwmTiming::for_frequency(SYS_CLK, 0),
            Err(PwmError::UnsupportedFrequency)
        );
        // Needs a divider above 255.9375
        assert_eq!(
            PwmTiming::for_frequency(SYS_CLK, 5),
            Err(PwmError::UnsupportedFrequency)
        );
        // Fewer than two counts per period
        assert_eq!(
            PwmTiming::for_frequency(SYS_CLK, 100_000_000),
            Err(PwmError::UnsupportedFrequency)
        );
    }

    #[test]
    fn test_compare_values() {
        let timing = PwmTiming {
            divider_16ths: 16,
            top: 999,
        };
        assert_eq!(timing.compare_for(0.0), 0);
        assert_eq!(timing.compare_for(50.0), 500);
        assert_eq!(timing.compare_for(100.0), 1000);
        assert_eq!(timing.compare_for(150.0), 1000);
        assert_eq!(timing.compare_for(-5.0), 0);
    }
}
