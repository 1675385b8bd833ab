//! RP2040-specific HAL for the Ranger firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `ranger-hal` traits:
//!
//! - GPIO wrappers (input, output, direction-switching flex pin)
//! - Dynamic pin allocation for config-driven setup
//! - PWM slice channels with divider/top calculation
//! - Clock backed by the embassy time driver

#![no_std]

pub mod clock;
pub mod gpio;
pub mod pins;
pub mod pwm;

pub use clock::EmbassyClock;
pub use gpio::{RpFlexPin, RpInput, RpOutput};
pub use pins::{PinBank, PinError};
pub use pwm::{PwmTiming, SliceChannel, SliceOutput};
