//! Demo mode sequencing
//!
//! Demo runs a four-second pattern, one phase per whole second of demo
//! time: Sprint (fast), Cruise (slow), Rest (stopped), Coast (slow).
//!
//! Demo time starts when the control loop starts. Whether it keeps running
//! while a safety override holds the robot is a policy choice, see
//! [`DemoClockPolicy`].

use ranger_hal::Instant;

use crate::motion::MotionCommand;

/// Number of phases in one demo period
pub const DEMO_PHASES: u64 = 4;

/// Length of one demo phase
pub const DEMO_PHASE_MS: u64 = 1000;

/// Phase of the demo pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoPhase {
    /// Second 0: full speed
    Sprint,
    /// Second 1: slow
    Cruise,
    /// Second 2: stopped
    Rest,
    /// Second 3: slow
    Coast,
}

impl DemoPhase {
    /// Phase for `elapsed_ms` of demo time
    pub fn at(elapsed_ms: u64) -> Self {
        match (elapsed_ms / DEMO_PHASE_MS) % DEMO_PHASES {
            0 => DemoPhase::Sprint,
            1 => DemoPhase::Cruise,
            2 => DemoPhase::Rest,
            _ => DemoPhase::Coast,
        }
    }

    /// Motion for this phase
    pub fn command(self) -> MotionCommand {
        match self {
            DemoPhase::Sprint => MotionCommand::Fast,
            DemoPhase::Cruise | DemoPhase::Coast => MotionCommand::Slow,
            DemoPhase::Rest => MotionCommand::Stop,
        }
    }
}

/// How demo time behaves during a safety override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoClockPolicy {
    /// Demo time follows wall time; the pattern carries on underneath an
    /// override and resumes wherever it has got to
    #[default]
    FreeRunning,
    /// Demo time stops while the override holds and resumes where it left off
    PauseOnOverride,
}

/// Demo time keeper
#[derive(Debug, Clone)]
pub struct DemoClock {
    policy: DemoClockPolicy,
    /// When demo time started
    origin: Option<Instant>,
    /// Demo time excluded by pauses (µs)
    paused_us: u64,
    /// Previous update, for measuring pause intervals
    last_update: Option<Instant>,
    /// Whether the previous update was under override
    was_overridden: bool,
}

impl DemoClock {
    /// Create a stopped demo clock
    pub const fn new(policy: DemoClockPolicy) -> Self {
        Self {
            policy,
            origin: None,
            paused_us: 0,
            last_update: None,
            was_overridden: false,
        }
    }

    /// Start (or restart) demo time at `now`
    pub fn start(&mut self, now: Instant) {
        self.origin = Some(now);
        self.paused_us = 0;
        self.last_update = Some(now);
        self.was_overridden = false;
    }

    /// Account for the interval since the previous update
    ///
    /// `overridden` is whether the safety override holds from this cycle
    /// on. Only an interval that began under override counts as paused, so
    /// time driven before an obstacle was first seen still advances the demo.
    pub fn update(&mut self, now: Instant, overridden: bool) {
        if self.origin.is_none() {
            self.start(now);
            self.was_overridden = overridden;
            return;
        }

        if self.was_overridden && self.policy == DemoClockPolicy::PauseOnOverride {
            if let Some(last) = self.last_update {
                self.paused_us = self.paused_us.saturating_add(now.micros_since(last));
            }
        }
        self.last_update = Some(now);
        self.was_overridden = overridden;
    }

    /// Demo time elapsed at `now`, in milliseconds
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        match self.origin {
            Some(origin) => now.micros_since(origin).saturating_sub(self.paused_us) / 1000,
            None => 0,
        }
    }

    /// Demo phase at `now`
    pub fn phase(&self, now: Instant) -> DemoPhase {
        DemoPhase::at(self.elapsed_ms(now))
    }
}
