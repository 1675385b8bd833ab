//! PWM motor bank
//!
//! Owns one PWM channel per drive motor. Channels are bound (carrier
//! started at the configured frequency) by [`MotionController::init`];
//! a channel that failed to bind is retried the next time it is written,
//! so a bad start never leaves a motor permanently dead.
//!
//! ```ignore
//! let mut motors = MotorBank::new([Some(m1), Some(m2), Some(m3), Some(m4)], 1000);
//! motors.init();
//! motors.run_slow(); // every motor at 120/255
//! motors.release();  // 0% duty, carriers stopped
//! ```

use ranger_core::motion::{value_to_duty, MotorChannel, MAX_VALUE, MOTOR_COUNT};
use ranger_core::traits::MotionController;
use ranger_hal::PwmChannel;

struct MotorSlot<P> {
    pwm: P,
    /// Carrier running at the bank frequency
    bound: bool,
    /// Last value written (clamped)
    value: i32,
}

/// Four PWM-driven motors
pub struct MotorBank<P> {
    slots: [Option<MotorSlot<P>>; MOTOR_COUNT],
    frequency_hz: u32,
}

impl<P: PwmChannel> MotorBank<P> {
    /// Create a bank; `None` channels are not fitted and ignore writes
    pub fn new(channels: [Option<P>; MOTOR_COUNT], frequency_hz: u32) -> Self {
        Self {
            slots: channels.map(|pwm| {
                pwm.map(|pwm| MotorSlot {
                    pwm,
                    bound: false,
                    value: 0,
                })
            }),
            frequency_hz,
        }
    }

    /// PWM carrier frequency
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Check if a channel is fitted
    pub fn is_configured(&self, channel: MotorChannel) -> bool {
        self.slots[channel.index()].is_some()
    }

    /// Check if a channel's carrier is running
    pub fn is_bound(&self, channel: MotorChannel) -> bool {
        self.slots[channel.index()]
            .as_ref()
            .is_some_and(|slot| slot.bound)
    }

    /// Last value written to a channel
    pub fn value(&self, channel: MotorChannel) -> Option<i32> {
        self.slots[channel.index()].as_ref().map(|slot| slot.value)
    }

    /// Duty a channel was last set to
    pub fn duty_percent(&self, channel: MotorChannel) -> Option<f32> {
        self.value(channel).map(value_to_duty)
    }

    fn bind(slot: &mut MotorSlot<P>, channel: MotorChannel, frequency_hz: u32) -> bool {
        if slot.bound {
            return true;
        }
        match slot.pwm.start(frequency_hz) {
            Ok(()) => {
                slot.bound = true;
                ranger_core::log_debug!("Motor {:?} bound at {} Hz", channel, frequency_hz);
            }
            Err(e) => {
                ranger_core::log_warn!("Motor {:?} PWM start failed: {:?}", channel, e);
            }
        }
        slot.bound
    }
}

impl<P: PwmChannel> MotionController for MotorBank<P> {
    fn init(&mut self) {
        for channel in MotorChannel::ALL {
            if let Some(slot) = self.slots[channel.index()].as_mut() {
                Self::bind(slot, channel, self.frequency_hz);
            }
        }
    }

    fn set_motor(&mut self, channel: MotorChannel, value: i32) {
        let Some(slot) = self.slots[channel.index()].as_mut() else {
            return;
        };
        if !Self::bind(slot, channel, self.frequency_hz) {
            return;
        }

        let value = value.clamp(0, MAX_VALUE);
        if let Err(e) = slot.pwm.set_duty_percent(value_to_duty(value)) {
            ranger_core::log_warn!("Motor {:?} duty update failed: {:?}", channel, e);
            return;
        }
        slot.value = value;
    }

    fn release(&mut self) {
        for channel in MotorChannel::ALL {
            let Some(slot) = self.slots[channel.index()].as_mut() else {
                continue;
            };
            if slot.bound {
                // Output must read 0% even if the stop below is a no-op
                let _ = slot.pwm.set_duty_percent(0.0);
            }
            slot.pwm.stop();
            slot.bound = false;
            slot.value = 0;
        }
    }
}
