//! Configuration types
//!
//! Board-agnostic configuration read once at start-up from the TOML text
//! compiled into the firmware.

pub mod hardware;
pub mod parse;

pub use hardware::*;
pub use parse::{parse_config, parse_pin_string, ParseError, ParseErrorKind};
