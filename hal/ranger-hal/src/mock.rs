//! Host-side test doubles
//!
//! Every mock is a cheap handle around shared state (`Rc`), so a test can
//! keep one clone for inspection while the code under test owns another.
//!
//! Time only moves when something asks for it: every [`Clock::now`] call
//! advances the [`MockClock`] by its poll step, and every delay advances it
//! by exactly the requested amount. Busy-wait loops therefore terminate.

extern crate std;

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::clock::{Clock, Instant};
use crate::gpio::{FlexPin, InputPin, OutputPin, PinMode};
use crate::pwm::{PwmChannel, PwmError};

/// Simulated monotonic clock
#[derive(Debug, Clone)]
pub struct MockClock {
    now_us: Rc<Cell<u64>>,
    poll_step_us: u64,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Clock at t=0 that advances 1µs per `now()` call
    pub fn new() -> Self {
        Self::with_poll_step(1)
    }

    /// Clock at t=0 that advances `poll_step_us` per `now()` call
    pub fn with_poll_step(poll_step_us: u64) -> Self {
        Self {
            now_us: Rc::new(Cell::new(0)),
            poll_step_us,
        }
    }

    /// Current time without advancing
    pub fn peek(&self) -> Instant {
        Instant::from_micros(self.now_us.get())
    }

    /// Move time forward
    pub fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    /// Move time forward in milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        let now = self.peek();
        self.advance_us(self.poll_step_us);
        now
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance_us((ns as u64).div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.advance_us(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance_ms(ms as u64);
    }
}

/// Something that happened to a mock pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEvent {
    /// Direction/pull changed
    Configured(PinMode),
    /// Output level written
    Write(bool),
}

/// General-purpose mock pin (buttons, indicator LEDs)
///
/// Input level is set by the test with [`MockPin::set_level`]. Writes
/// update the level; direction changes are ignored.
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
}

impl MockPin {
    /// Pin reading low
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin reading `high`
    pub fn with_level(high: bool) -> Self {
        let pin = Self::new();
        pin.set_level(high);
        pin
    }

    /// Drive the simulated input level
    pub fn set_level(&self, high: bool) {
        self.level.set(high);
    }

    /// Current level
    pub fn level(&self) -> bool {
        self.level.get()
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.level.set(true);
    }

    fn set_low(&mut self) {
        self.level.set(false);
    }

    fn is_set_high(&self) -> bool {
        self.level.get()
    }
}

impl InputPin for MockPin {
    fn is_high(&self) -> bool {
        self.level.get()
    }
}

impl FlexPin for MockPin {
    fn configure(&mut self, _mode: PinMode) {}
}

#[derive(Debug)]
struct EchoState {
    rise_after_us: Option<u64>,
    high_for_us: Option<u64>,
    listening_since: Option<Instant>,
    output_level: bool,
    timeline: Vec<(Instant, PinEvent)>,
}

/// Simulated single-wire ultrasonic ranger
///
/// Once the pin is switched to input the echo line rises after
/// `rise_after_us` and stays high for `high_for_us`. `None` for either
/// models a sensor that never answers or never releases the line.
#[derive(Debug, Clone)]
pub struct MockEchoPin {
    clock: MockClock,
    state: Rc<RefCell<EchoState>>,
}

impl MockEchoPin {
    /// Echo scripted against `clock`
    pub fn new(clock: &MockClock, rise_after_us: Option<u64>, high_for_us: Option<u64>) -> Self {
        Self {
            clock: clock.clone(),
            state: Rc::new(RefCell::new(EchoState {
                rise_after_us,
                high_for_us,
                listening_since: None,
                output_level: false,
                timeline: Vec::new(),
            })),
        }
    }

    /// Sensor that reports an object at `distance_cm`
    pub fn at_distance(clock: &MockClock, distance_cm: f32) -> Self {
        // Round trip at 343 m/s is 58.31µs per cm
        let pulse_us = (distance_cm * 2.0 / 0.0343) as u64;
        Self::new(clock, Some(100), Some(pulse_us))
    }

    /// Sensor that never answers
    pub fn silent(clock: &MockClock) -> Self {
        Self::new(clock, None, None)
    }

    /// Change the script for the next ping
    pub fn set_echo(&self, rise_after_us: Option<u64>, high_for_us: Option<u64>) {
        let mut state = self.state.borrow_mut();
        state.rise_after_us = rise_after_us;
        state.high_for_us = high_for_us;
    }

    /// Report `distance_cm` on the next ping
    pub fn set_distance(&self, distance_cm: f32) {
        self.set_echo(Some(100), Some((distance_cm * 2.0 / 0.0343) as u64));
    }

    /// Timestamped configure/write history
    pub fn timeline(&self) -> Vec<(Instant, PinEvent)> {
        self.state.borrow().timeline.clone()
    }

    fn record(&self, event: PinEvent) {
        let now = self.clock.peek();
        self.state.borrow_mut().timeline.push((now, event));
    }
}

impl OutputPin for MockEchoPin {
    fn set_high(&mut self) {
        self.state.borrow_mut().output_level = true;
        self.record(PinEvent::Write(true));
    }

    fn set_low(&mut self) {
        self.state.borrow_mut().output_level = false;
        self.record(PinEvent::Write(false));
    }

    fn is_set_high(&self) -> bool {
        self.state.borrow().output_level
    }
}

impl InputPin for MockEchoPin {
    fn is_high(&self) -> bool {
        let state = self.state.borrow();
        let (Some(since), Some(rise)) = (state.listening_since, state.rise_after_us) else {
            return false;
        };
        let elapsed = self.clock.peek().micros_since(since);
        if elapsed < rise {
            return false;
        }
        match state.high_for_us {
            Some(high) => elapsed < rise + high,
            None => true,
        }
    }
}

impl FlexPin for MockEchoPin {
    fn configure(&mut self, mode: PinMode) {
        let now = self.clock.peek();
        {
            let mut state = self.state.borrow_mut();
            state.listening_since = match mode {
                PinMode::Input(_) => Some(now),
                PinMode::Output => None,
            };
        }
        self.record(PinEvent::Configured(mode));
    }
}

#[derive(Debug, Default)]
struct PwmState {
    running: bool,
    frequency_hz: Option<u32>,
    duty: f32,
    starts: u32,
    stops: u32,
    fail_start: bool,
    duty_history: Vec<f32>,
}

/// Mock PWM channel that records every change
#[derive(Debug, Clone, Default)]
pub struct MockPwm {
    state: Rc<RefCell<PwmState>>,
}

impl MockPwm {
    /// Stopped channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel whose `start` fails until [`MockPwm::set_fail_start`] clears it
    pub fn failing() -> Self {
        let pwm = Self::new();
        pwm.set_fail_start(true);
        pwm
    }

    /// Make `start` fail (or succeed again)
    pub fn set_fail_start(&self, fail: bool) {
        self.state.borrow_mut().fail_start = fail;
    }

    /// Current duty in percent
    pub fn duty(&self) -> f32 {
        self.state.borrow().duty
    }

    /// Carrier frequency of the last successful start
    pub fn frequency_hz(&self) -> Option<u32> {
        self.state.borrow().frequency_hz
    }

    /// Successful starts so far
    pub fn start_count(&self) -> u32 {
        self.state.borrow().starts
    }

    /// Stops so far
    pub fn stop_count(&self) -> u32 {
        self.state.borrow().stops
    }

    /// Every duty written so far
    pub fn duty_history(&self) -> Vec<f32> {
        self.state.borrow().duty_history.clone()
    }
}

impl PwmChannel for MockPwm {
    fn start(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        let mut state = self.state.borrow_mut();
        if state.fail_start {
            return Err(PwmError::UnsupportedFrequency);
        }
        state.running = true;
        state.frequency_hz = Some(frequency_hz);
        state.duty = 0.0;
        state.starts += 1;
        Ok(())
    }

    fn set_duty_percent(&mut self, duty: f32) -> Result<(), PwmError> {
        let mut state = self.state.borrow_mut();
        if !state.running {
            return Err(PwmError::NotRunning);
        }
        let duty = duty.clamp(0.0, 100.0);
        state.duty = duty;
        state.duty_history.push(duty);
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.running = false;
        state.duty = 0.0;
        state.stops += 1;
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }
}
