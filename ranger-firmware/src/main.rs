//! Ranger - Obstacle-Aware Drive Controller Firmware
//!
//! Main firmware binary for RP2040-based four-motor robots. Four buttons
//! pick the pace, an ultrasonic ranger vetoes it.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use ranger_core::config::{parse_config, RobotConfig};
use ranger_hal_rp2040::PinBank;

mod board;
mod channels;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit robot.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../robot.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Ranger firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: threshold {} cm, PWM {} Hz, {} ms cycle, demo clock {:?}",
        config.safety_threshold_cm,
        config.pwm_frequency_hz,
        config.loop_delay_ms,
        config.demo_clock
    );

    let mut pins = PinBank::new(p);
    let board = board::Board::assemble(&config, &mut pins);
    info!("Board assembled");

    if let Some(button) = board.shutdown_button {
        spawner.spawn(tasks::shutdown_task(button)).unwrap();
    }
    spawner.spawn(tasks::control_task(board.robot)).unwrap();

    info!("Boot complete");
}

/// Parse and validate the embedded config, falling back to defaults
fn load_config() -> RobotConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "robot.toml line {}: {:?}, using defaults",
                e.line, e.kind
            );
            return RobotConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Loaded embedded robot.toml");
            config
        }
        Err(e) => {
            warn!("robot.toml rejected: {:?}, using defaults", e);
            RobotConfig::default()
        }
    }
}
