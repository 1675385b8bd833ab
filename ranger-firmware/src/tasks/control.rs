//! Control loop task
//!
//! Runs one control cycle, then waits out the loop delay or a shutdown
//! request, whichever comes first. On shutdown the loop releases the
//! motors and indicator before the task ends.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use ranger_core::traits::ShutdownSignal;
use ranger_hal::Clock;
use ranger_hal_rp2040::EmbassyClock;

use crate::board::Robot;
use crate::channels::{ShutdownRequest, SHUTDOWN, STOPPED};

/// Control loop task
#[embassy_executor::task]
pub async fn control_task(mut robot: Robot) {
    info!("Control task started");

    let clock = EmbassyClock::new();
    let delay = Duration::from_millis(robot.loop_delay_ms() as u64);

    robot.setup(clock.now());

    while !ShutdownRequest.is_requested() {
        if let Some(report) = robot.step(clock.now()) {
            trace!(
                "mode={:?} reading={:?} command={:?}",
                report.mode,
                report.reading,
                report.command
            );
        }

        match select(SHUTDOWN.wait(), Timer::after(delay)).await {
            Either::First(()) => break,
            Either::Second(()) => {}
        }
    }

    robot.shutdown();

    let stats = robot.stats();
    info!(
        "Stopped: {} cycles, {} overrides, {} sensor timeouts",
        stats.cycles, stats.overrides, stats.timeouts
    );
    STOPPED.signal(stats);
}
