//! Ranger Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040 today). The drivers and the control loop
//! only ever see these traits, so the same logic runs on the robot and in
//! host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (ranger-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ranger-core / ranger-drivers           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ranger-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ ranger-hal-   │       │ mock (host    │
//! │    rp2040     │       │   tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`pwm::PwmChannel`] - Fixed-frequency PWM output
//! - [`clock::Clock`] - Monotonic time plus `embedded_hal` delays

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod pwm;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use clock::{wait_until, Clock, Deadline, Instant, TimedOut};
pub use gpio::{FlexPin, InputPin, OutputPin, PinMode, Pull};
pub use pwm::{PwmChannel, PwmError};
