//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in ranger-core, written against the `ranger-hal` pin and PWM traits:
//!
//! - Ultrasonic ranger (single-wire ping sensor)
//! - Mode-select button panel
//! - PWM motor bank
//! - Indicator LED

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod input;
pub mod motor;
pub mod output;
pub mod sensor;
