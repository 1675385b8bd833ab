//! Distance sensing
//!
//! Reading types and the echo timing constants shared by every ultrasonic
//! driver.

pub mod reading;

pub use reading::{
    echo_to_cm, DistanceReading, RangingError, ECHO_TIMEOUT_US, SETTLE_US,
    SPEED_OF_SOUND_CM_PER_S, TRIGGER_PULSE_US,
};
