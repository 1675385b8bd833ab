//! Mode selector trait

use crate::state::Mode;

/// Source of the operator's mode choice
pub trait ModeSelector {
    /// Sample the inputs and resolve a mode
    fn read_mode(&mut self) -> Mode;
}
