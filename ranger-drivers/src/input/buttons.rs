//! Mode-select button panel
//!
//! Four momentary buttons, normally wired from the pin to ground with the
//! internal pull-up enabled, so a pressed button reads low. Buttons are
//! sampled once per control cycle with no debouncing; a bounce only
//! lasts until the next cycle.

use ranger_core::state::{Mode, BUTTON_COUNT};
use ranger_core::traits::ModeSelector;
use ranger_hal::InputPin;

/// One push button
pub struct Button<P> {
    pin: P,
    /// Pressed reads low
    active_low: bool,
}

impl<P: InputPin> Button<P> {
    /// Create a button with the given polarity
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Button to ground with pull-up (pressed = low)
    pub fn active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Check if the button is held
    pub fn is_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }
}

/// The four mode buttons in priority order: Fast, Slow, Stop, Demo
///
/// Missing buttons read as released.
pub struct ButtonPanel<P> {
    buttons: [Option<Button<P>>; BUTTON_COUNT],
}

impl<P: InputPin> ButtonPanel<P> {
    /// Create a panel from its buttons
    pub fn new(buttons: [Option<Button<P>>; BUTTON_COUNT]) -> Self {
        Self { buttons }
    }

    /// Sample every button (true = pressed)
    pub fn pressed(&self) -> [bool; BUTTON_COUNT] {
        let mut state = [false; BUTTON_COUNT];
        for (slot, button) in state.iter_mut().zip(&self.buttons) {
            *slot = button.as_ref().is_some_and(Button::is_pressed);
        }
        state
    }
}

impl<P: InputPin> ModeSelector for ButtonPanel<P> {
    fn read_mode(&mut self) -> Mode {
        Mode::from_buttons(self.pressed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranger_hal::mock::MockPin;

    /// Panel of active-low buttons, all released (pins pulled high)
    fn panel() -> ([MockPin; BUTTON_COUNT], ButtonPanel<MockPin>) {
        let pins: [MockPin; BUTTON_COUNT] = core::array::from_fn(|_| MockPin::with_level(true));
        let buttons = pins.clone().map(|p| Some(Button::active_low(p)));
        (pins, ButtonPanel::new(buttons))
    }

    #[test]
    fn test_released_panel_is_idle() {
        let (_pins, mut panel) = panel();
        assert_eq!(panel.pressed(), [false; BUTTON_COUNT]);
        assert_eq!(panel.read_mode(), Mode::Idle);
    }

    #[test]
    fn test_pressed_reads_low() {
        let (pins, mut panel) = panel();

        pins[1].set_level(false);
        assert_eq!(panel.read_mode(), Mode::Slow);

        pins[3].set_level(false);
        assert_eq!(panel.read_mode(), Mode::Slow);

        pins[0].set_level(false);
        assert_eq!(panel.read_mode(), Mode::Fast);

        pins[0].set_level(true);
        pins[1].set_level(true);
        assert_eq!(panel.read_mode(), Mode::Demo);
    }

    #[test]
    fn test_missing_button_reads_released() {
        let stop = MockPin::with_level(false);
        let mut panel = ButtonPanel::new([None, None, Some(Button::active_low(stop)), None]);
        assert_eq!(panel.read_mode(), Mode::Stop);
    }

    #[test]
    fn test_active_high_button() {
        let pin = MockPin::with_level(true);
        let button = Button::new(pin.clone(), false);
        assert!(button.is_pressed());
        pin.set_level(false);
        assert!(!button.is_pressed());
    }
}
