//! Operator input

pub mod buttons;

pub use buttons::{Button, ButtonPanel};
