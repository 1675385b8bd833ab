//! Motion commands
//!
//! Maps the 0-255 speed scale to PWM duty and names the fixed set of
//! motions the robot can be asked to perform.

pub mod command;

pub use command::{
    value_to_duty, MotionCommand, MotorChannel, FAST_VALUE, MAX_VALUE, MOTOR_COUNT, SLOW_VALUE,
};
