//! Motor driver implementations
//!
//! Drive motors are plain PWM outputs (one per motor driver input); speed
//! is set on the 0-255 scale and mapped to duty percent.

pub mod pwm_bank;

pub use pwm_bank::MotorBank;
