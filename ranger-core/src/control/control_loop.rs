//! Control loop state machine
//!
//! ```text
//!  Created ──setup()──> Running ──shutdown()──> Released
//!     │                                           ^
//!     └────────────────shutdown()─────────────────┘
//! ```
//!
//! Per cycle:
//!
//! 1. Sample the buttons
//! 2. Take one distance reading (a timeout counts as no obstacle)
//! 3. Valid reading under the threshold: stop everything, indicator on
//! 4. Otherwise: drive per mode (and demo phase), indicator off

use ranger_hal::{Clock, Instant, OutputPin};

use crate::config::RobotConfig;
use crate::motion::MotionCommand;
use crate::safety::{SafetyMonitor, SafetyStatus};
use crate::sensor::DistanceReading;
use crate::state::{DemoClock, Mode};
use crate::traits::{DistanceSensor, ModeSelector, MotionController, ShutdownSignal};

/// Granularity of the inter-cycle sleep; shutdown is checked between slices
const SLEEP_SLICE_MS: u32 = 1;

/// Lifecycle of a [`ControlLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopPhase {
    /// Built, hardware not yet touched
    Created,
    /// Set up and cycling
    Running,
    /// Cleaned up; no further hardware access
    Released,
}

/// Running counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStats {
    /// Completed cycles
    pub cycles: u32,
    /// Cycles that ended in a safety override
    pub overrides: u32,
    /// Cycles without a valid distance reading
    pub timeouts: u32,
}

/// What one cycle observed and did
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    pub mode: Mode,
    pub reading: DistanceReading,
    pub safety: SafetyStatus,
    /// Motion actually applied (after the safety gate)
    pub command: MotionCommand,
    pub indicator_on: bool,
}

/// The robot's control loop
///
/// Owns the mode selector, distance sensor, motion controller and the
/// optional indicator. Dropping a loop that has not been shut down runs
/// the cleanup path.
pub struct ControlLoop<S, D, M, I>
where
    S: ModeSelector,
    D: DistanceSensor,
    M: MotionController,
    I: OutputPin,
{
    selector: S,
    sensor: D,
    motion: M,
    indicator: Option<I>,
    safety: SafetyMonitor,
    demo: DemoClock,
    loop_delay_ms: u32,
    mode: Mode,
    overridden: bool,
    phase: LoopPhase,
    stats: LoopStats,
}

impl<S, D, M, I> ControlLoop<S, D, M, I>
where
    S: ModeSelector,
    D: DistanceSensor,
    M: MotionController,
    I: OutputPin,
{
    /// Assemble a loop from its components
    ///
    /// No hardware is touched until [`ControlLoop::setup`] (or the first
    /// [`ControlLoop::step`]).
    pub fn new(
        config: &RobotConfig,
        selector: S,
        sensor: D,
        motion: M,
        indicator: Option<I>,
    ) -> Self {
        Self {
            selector,
            sensor,
            motion,
            indicator,
            safety: SafetyMonitor::new(config.safety_threshold_cm),
            demo: DemoClock::new(config.demo_clock),
            loop_delay_ms: config.loop_delay_ms,
            mode: Mode::Idle,
            overridden: false,
            phase: LoopPhase::Created,
            stats: LoopStats::default(),
        }
    }

    /// Lifecycle phase
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Counters so far
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Mode seen on the last cycle
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Delay between cycles
    pub fn loop_delay_ms(&self) -> u32 {
        self.loop_delay_ms
    }

    /// Motion controller, for inspection
    pub fn motion(&self) -> &M {
        &self.motion
    }

    /// Bind the motors, stop them and start demo time
    ///
    /// Does nothing unless the loop is freshly created.
    pub fn setup(&mut self, now: Instant) {
        if self.phase != LoopPhase::Created {
            return;
        }

        log_info!(
            "Control loop starting: threshold {} cm, {} ms cycle",
            self.safety.threshold_cm(),
            self.loop_delay_ms
        );

        self.motion.init();
        self.motion.stop_all();
        self.set_indicator(false);
        self.demo.start(now);
        self.phase = LoopPhase::Running;
    }

    /// Run one control cycle at `now`
    ///
    /// Sets up on first use. Returns `None` once the loop has been shut
    /// down.
    pub fn step(&mut self, now: Instant) -> Option<CycleReport> {
        match self.phase {
            LoopPhase::Released => return None,
            LoopPhase::Created => self.setup(now),
            LoopPhase::Running => {}
        }

        let mode = self.selector.read_mode();
        if mode != self.mode {
            log_info!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }

        let reading = self.sensor.measure();
        if !reading.valid {
            self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
            log_debug!("No echo, treating as clear");
        }

        let safety = self.safety.check(&reading);
        let overridden = safety.is_override();
        if overridden != self.overridden {
            if let SafetyStatus::Obstacle { distance_cm } = safety {
                log_warn!("Obstacle at {} cm, stopping", distance_cm);
            } else {
                log_info!("Path clear, resuming {:?}", mode);
            }
            self.overridden = overridden;
        }
        if overridden {
            self.stats.overrides = self.stats.overrides.wrapping_add(1);
        }

        self.demo.update(now, overridden);
        let command = safety.gate(mode.command(self.demo.phase(now)));

        self.motion.apply(command);
        self.set_indicator(overridden);
        self.stats.cycles = self.stats.cycles.wrapping_add(1);

        Some(CycleReport {
            mode,
            reading,
            safety,
            command,
            indicator_on: overridden,
        })
    }

    /// Cycle until `shutdown` is requested, then clean up
    ///
    /// Blocking runner for hosts and tests; the firmware drives
    /// [`ControlLoop::step`] from its own async task instead.
    ///
    /// The inter-cycle delay is slept in short slices so a request is seen
    /// promptly. Returns the number of cycles run by this call.
    pub fn run<C, X>(&mut self, clock: &mut C, shutdown: &X) -> u32
    where
        C: Clock,
        X: ShutdownSignal + ?Sized,
    {
        let mut cycles = 0;

        'cycle: while !shutdown.is_requested() {
            if self.step(clock.now()).is_none() {
                break;
            }
            cycles += 1;

            let mut remaining = self.loop_delay_ms;
            while remaining > 0 {
                if shutdown.is_requested() {
                    break 'cycle;
                }
                let slice = remaining.min(SLEEP_SLICE_MS);
                clock.delay_ms(slice);
                remaining -= slice;
            }
        }

        self.shutdown();
        cycles
    }

    /// Stop the motors, turn the indicator off and release the hardware
    ///
    /// Safe to call in any phase; only the first call does anything. A loop
    /// that was never set up has driven nothing, so it only releases.
    pub fn shutdown(&mut self) {
        match self.phase {
            LoopPhase::Released => return,
            LoopPhase::Created => {}
            LoopPhase::Running => self.motion.stop_all(),
        }

        self.set_indicator(false);
        self.motion.release();
        self.phase = LoopPhase::Released;

        log_info!("Control loop stopped after {} cycles", self.stats.cycles);
    }

    fn set_indicator(&mut self, on: bool) {
        if let Some(pin) = self.indicator.as_mut() {
            pin.set_state(on);
        }
    }
}

impl<S, D, M, I> Drop for ControlLoop<S, D, M, I>
where
    S: ModeSelector,
    D: DistanceSensor,
    M: MotionController,
    I: OutputPin,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
