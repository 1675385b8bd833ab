//! GPIO wrappers implementing the `ranger-hal` pin traits

use embassy_rp::gpio::{AnyPin, Flex, Input, Level, Output, Pull as RpPull};
use embassy_rp::Peri;
use ranger_hal::{FlexPin, InputPin, OutputPin, PinMode, Pull};

fn to_rp_pull(pull: Pull) -> RpPull {
    match pull {
        Pull::None => RpPull::None,
        Pull::Up => RpPull::Up,
        Pull::Down => RpPull::Down,
    }
}

/// Input pin
pub struct RpInput {
    pin: Input<'static>,
}

impl RpInput {
    /// Configure `pin` as an input
    pub fn new(pin: Peri<'static, AnyPin>, pull: Pull) -> Self {
        Self {
            pin: Input::new(pin, to_rp_pull(pull)),
        }
    }

    /// Wait for the pin to go low
    pub async fn wait_for_low(&mut self) {
        self.pin.wait_for_low().await
    }

    /// Wait for the pin to go high
    pub async fn wait_for_high(&mut self) {
        self.pin.wait_for_high().await
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Push-pull output pin
pub struct RpOutput {
    pin: Output<'static>,
}

impl RpOutput {
    /// Configure `pin` as an output at `initial_high`
    pub fn new(pin: Peri<'static, AnyPin>, initial_high: bool) -> Self {
        Self {
            pin: Output::new(pin, Level::from(initial_high)),
        }
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Pin that switches between input and output
///
/// Starts as a floating input.
pub struct RpFlexPin {
    pin: Flex<'static>,
}

impl RpFlexPin {
    /// Take `pin` as a flex pin
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(RpPull::None);
        pin.set_as_input();
        Self { pin }
    }
}

impl OutputPin for RpFlexPin {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl InputPin for RpFlexPin {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for RpFlexPin {
    fn configure(&mut self, mode: PinMode) {
        match mode {
            PinMode::Output => {
                self.pin.set_pull(RpPull::None);
                self.pin.set_as_output();
            }
            PinMode::Input(pull) => {
                self.pin.set_pull(to_rp_pull(pull));
                self.pin.set_as_input();
            }
        }
    }
}
