//! Board-agnostic core logic for the Ranger robot firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Component traits (distance sensor, mode selector, motion controller)
//! - Mode selection and demo phase sequencing
//! - Safety monitoring logic
//! - The control loop that ties them together
//! - Configuration types and the embedded config parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
pub mod log;

pub mod config;
pub mod control;
pub mod motion;
pub mod safety;
pub mod sensor;
pub mod state;
pub mod traits;
