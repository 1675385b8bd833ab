//! Mode definition
//!
//! All motion outside a safety override is a function of the current mode
//! and, for Demo, the demo phase.

use super::demo::DemoPhase;
use crate::motion::MotionCommand;

/// Number of mode-select buttons
pub const BUTTON_COUNT: usize = 4;

/// Operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No button held, motors off
    #[default]
    Idle,
    /// Button 1: full speed
    Fast,
    /// Button 2: reduced speed
    Slow,
    /// Button 3: motors off
    Stop,
    /// Button 4: cycle Fast, Slow, Stop, Slow once per second
    Demo,
}

impl Mode {
    /// Resolve the mode from the button states (true = pressed)
    ///
    /// The lowest-numbered pressed button wins.
    pub fn from_buttons(pressed: [bool; BUTTON_COUNT]) -> Self {
        const PRIORITY: [Mode; BUTTON_COUNT] = [Mode::Fast, Mode::Slow, Mode::Stop, Mode::Demo];

        pressed
            .iter()
            .zip(PRIORITY)
            .find_map(|(&down, mode)| down.then_some(mode))
            .unwrap_or(Mode::Idle)
    }

    /// Motion this mode asks for, given the current demo phase
    pub fn command(self, phase: DemoPhase) -> MotionCommand {
        match self {
            Mode::Idle | Mode::Stop => MotionCommand::Stop,
            Mode::Fast => MotionCommand::Fast,
            Mode::Slow => MotionCommand::Slow,
            Mode::Demo => phase.command(),
        }
    }
}
