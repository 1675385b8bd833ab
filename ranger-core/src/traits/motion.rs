//! Motion controller trait
//!
//! Implementors only provide per-channel writes plus bind/release; the
//! all-motor operations are built on top and always visit every channel in
//! [`MotorChannel::ALL`] order.

use crate::motion::{MotionCommand, MotorChannel, FAST_VALUE, SLOW_VALUE};

/// Drive motor output stage
pub trait MotionController {
    /// Bind every configured channel (carrier running, duty 0)
    ///
    /// Channels that fail to bind are retried on first use.
    fn init(&mut self);

    /// Set one motor on the 0-255 speed scale
    ///
    /// Out-of-range values are clamped. Unconfigured channels ignore the
    /// write.
    fn set_motor(&mut self, channel: MotorChannel, value: i32);

    /// Stop and unbind every channel
    ///
    /// Idempotent. Leaves every channel at 0% duty with its carrier stopped.
    fn release(&mut self);

    /// Set every motor to 0
    fn stop_all(&mut self) {
        for channel in MotorChannel::ALL {
            self.set_motor(channel, 0);
        }
    }

    /// Set every motor to the Fast preset
    fn run_fast(&mut self) {
        for channel in MotorChannel::ALL {
            self.set_motor(channel, FAST_VALUE);
        }
    }

    /// Set every motor to the Slow preset
    fn run_slow(&mut self) {
        for channel in MotorChannel::ALL {
            self.set_motor(channel, SLOW_VALUE);
        }
    }

    /// Carry out a motion command
    fn apply(&mut self, command: MotionCommand) {
        match command {
            MotionCommand::Stop => self.stop_all(),
            MotionCommand::Fast => self.run_fast(),
            MotionCommand::Slow => self.run_slow(),
        }
    }
}
