//! Board assembly
//!
//! Turns the pin assignments from [`RobotConfig`] into drivers. A part
//! whose pin cannot be claimed is left unfitted and logged; the robot
//! still runs with whatever remains.

use defmt::*;
use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

use ranger_core::config::{PinConfig, RobotConfig};
use ranger_core::control::ControlLoop;
use ranger_drivers::input::{Button, ButtonPanel};
use ranger_drivers::motor::MotorBank;
use ranger_drivers::output::Indicator;
use ranger_drivers::sensor::PingSensor;
use ranger_hal::Pull;
use ranger_hal_rp2040::{EmbassyClock, PinBank, RpFlexPin, RpInput, RpOutput, SliceChannel};

use crate::tasks::ShutdownButton;

/// The control loop as wired on this board
pub type Robot = ControlLoop<
    ButtonPanel<RpInput>,
    PingSensor<RpFlexPin, EmbassyClock>,
    MotorBank<SliceChannel>,
    Indicator<RpOutput>,
>;

/// Everything the tasks need
pub struct Board {
    pub robot: Robot,
    pub shutdown_button: Option<ShutdownButton>,
}

impl Board {
    /// Claim pins for every configured part and build the drivers
    pub fn assemble(config: &RobotConfig, pins: &mut PinBank) -> Self {
        let sensor = match config.sensor_pin.and_then(|c| claim(pins, "sensor", c)) {
            Some(pin) => PingSensor::new(RpFlexPin::new(pin), EmbassyClock::new()),
            None => {
                warn!("No distance sensor, obstacle stop disabled");
                PingSensor::unconfigured(EmbassyClock::new())
            }
        };

        let buttons = config.button_pins.map(|cfg| {
            let c = cfg?;
            let pin = claim(pins, "button", c)?;
            Some(Button::new(RpInput::new(pin, pull(c)), c.inverted))
        });

        let motors = config.motor_pins.map(|cfg| {
            let c = cfg?;
            match pins.take_pwm(c.pin) {
                Ok(channel) => Some(channel),
                Err(e) => {
                    warn!("Motor pin gpio{} unavailable: {:?}", c.pin, e);
                    None
                }
            }
        });

        let indicator = config.indicator_pin.and_then(|c| {
            let pin = claim(pins, "indicator", c)?;
            // Start unlit
            Some(Indicator::new(RpOutput::new(pin, c.inverted), c.inverted))
        });

        let shutdown_button = config.shutdown_pin.and_then(|c| {
            let pin = claim(pins, "shutdown", c)?;
            Some(ShutdownButton {
                pin: RpInput::new(pin, pull(c)),
                active_low: c.inverted,
            })
        });

        let robot = ControlLoop::new(
            config,
            ButtonPanel::new(buttons),
            sensor,
            MotorBank::new(motors, config.pwm_frequency_hz),
            indicator,
        );

        Self {
            robot,
            shutdown_button,
        }
    }
}

fn pull(config: PinConfig) -> Pull {
    if config.pull_up {
        Pull::Up
    } else {
        Pull::None
    }
}

fn claim(pins: &mut PinBank, role: &str, config: PinConfig) -> Option<Peri<'static, AnyPin>> {
    match pins.take(config.pin) {
        Ok(pin) => Some(pin),
        Err(e) => {
            warn!("{} pin gpio{} unavailable: {:?}", role, config.pin, e);
            None
        }
    }
}
