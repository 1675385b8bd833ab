//! Control loop running the real drivers against mock hardware

use ranger_core::config::RobotConfig;
use ranger_core::control::{ControlLoop, LoopPhase};
use ranger_core::motion::{MotionCommand, MotorChannel, MOTOR_COUNT};
use ranger_core::safety::SafetyStatus;
use ranger_core::sensor::ECHO_TIMEOUT_US;
use ranger_core::state::{DemoClockPolicy, Mode, BUTTON_COUNT};
use ranger_core::traits::ShutdownSignal;
use ranger_drivers::input::{Button, ButtonPanel};
use ranger_drivers::motor::MotorBank;
use ranger_drivers::output::Indicator;
use ranger_drivers::sensor::PingSensor;
use ranger_hal::mock::{MockClock, MockEchoPin, MockPin, MockPwm};
use ranger_hal::{Clock, Instant, InputPin, PwmChannel};

type Robot = ControlLoop<
    ButtonPanel<MockPin>,
    PingSensor<MockEchoPin, MockClock>,
    MotorBank<MockPwm>,
    Indicator<MockPin>,
>;

struct Bench {
    clock: MockClock,
    buttons: [MockPin; BUTTON_COUNT],
    echo: MockEchoPin,
    pwms: [MockPwm; MOTOR_COUNT],
    led: MockPin,
    robot: Robot,
}

impl Bench {
    fn new(config: &RobotConfig) -> Self {
        Self::with_pwms(config, core::array::from_fn(|_| MockPwm::new()))
    }

    fn with_pwms(config: &RobotConfig, pwms: [MockPwm; MOTOR_COUNT]) -> Self {
        let clock = MockClock::new();
        // Active-low buttons, released
        let buttons: [MockPin; BUTTON_COUNT] = core::array::from_fn(|_| MockPin::with_level(true));
        let echo = MockEchoPin::silent(&clock);
        let led = MockPin::new();

        let robot = ControlLoop::new(
            config,
            ButtonPanel::new(buttons.clone().map(|p| Some(Button::active_low(p)))),
            PingSensor::new(echo.clone(), clock.clone()),
            MotorBank::new(pwms.clone().map(Some), config.pwm_frequency_hz),
            Some(Indicator::new(led.clone(), false)),
        );

        Self {
            clock,
            buttons,
            echo,
            pwms,
            led,
            robot,
        }
    }

    fn press(&self, button: usize) {
        self.buttons[button - 1].set_level(false);
    }

    fn duties(&self) -> [f32; MOTOR_COUNT] {
        core::array::from_fn(|i| self.pwms[i].duty())
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn test_obstacle_stops_fast_and_lights_indicator() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.press(1);
    bench.echo.set_distance(15.0);

    let now = bench.clock.now();
    let report = bench.robot.step(now).unwrap();

    assert_eq!(report.mode, Mode::Fast);
    assert!(report.safety.is_override());
    assert_eq!(bench.duties(), [0.0; MOTOR_COUNT]);
    assert!(bench.led.level());
}

#[test]
fn test_clear_path_runs_slow_with_indicator_off() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.press(2);
    bench.echo.set_distance(25.0);

    let now = bench.clock.now();
    let report = bench.robot.step(now).unwrap();

    assert_eq!(report.command, MotionCommand::Slow);
    assert_eq!(report.safety, SafetyStatus::Clear);
    assert!(bench.duties().iter().all(|d| approx(*d, 47.06)));
    assert!(!bench.led.level());
}

#[test]
fn test_silent_sensor_cycle_is_bounded() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.press(1);

    let start = bench.clock.now();
    let report = bench.robot.step(start).unwrap();
    let took = bench.clock.peek().micros_since(start);

    assert!(!report.reading.valid);
    assert_eq!(report.command, MotionCommand::Fast);
    assert!(bench.duties().iter().all(|d| *d == 100.0));
    assert!(took >= ECHO_TIMEOUT_US);
    assert!(took <= ECHO_TIMEOUT_US + 500, "cycle took {}µs", took);
}

#[test]
fn test_button_priority_through_panel() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.echo.set_distance(100.0);

    bench.press(3);
    bench.press(2);
    let now = bench.clock.now();
    assert_eq!(bench.robot.step(now).unwrap().mode, Mode::Slow);

    bench.press(1);
    let now = bench.clock.now();
    assert_eq!(bench.robot.step(now).unwrap().mode, Mode::Fast);
}

#[test]
fn test_demo_pattern() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.press(4);
    bench.echo.set_distance(100.0);

    bench.robot.setup(Instant::from_millis(0));
    let expected = [
        MotionCommand::Fast,
        MotionCommand::Slow,
        MotionCommand::Stop,
        MotionCommand::Slow,
        MotionCommand::Fast,
    ];
    for (second, want) in expected.into_iter().enumerate() {
        let at = Instant::from_millis(second as u64 * 1000 + 10);
        assert_eq!(bench.robot.step(at).unwrap().command, want, "second {}", second);
    }
}

#[test]
fn test_demo_pauses_under_override_when_configured() {
    let config = RobotConfig {
        demo_clock: DemoClockPolicy::PauseOnOverride,
        ..RobotConfig::default()
    };
    let mut bench = Bench::new(&config);
    bench.press(4);
    bench.robot.setup(Instant::from_millis(0));

    bench.echo.set_distance(100.0);
    bench.robot.step(Instant::from_millis(500));

    // Blocked from 1 s to 3.5 s
    bench.echo.set_distance(10.0);
    for ms in (1000..=3500).step_by(500) {
        let report = bench.robot.step(Instant::from_millis(ms)).unwrap();
        assert_eq!(report.command, MotionCommand::Stop);
    }

    bench.echo.set_distance(100.0);
    let report = bench.robot.step(Instant::from_millis(3600)).unwrap();
    // Drove until the obstacle at 1 s; the 2.6 s stopped do not count
    assert_eq!(report.command, MotionCommand::Slow);
    let report = bench.robot.step(Instant::from_millis(4500)).unwrap();
    assert_eq!(report.command, MotionCommand::Slow);
    let report = bench.robot.step(Instant::from_millis(4700)).unwrap();
    assert_eq!(report.command, MotionCommand::Stop);
}

#[test]
fn test_cleanup_after_run() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.press(1);
    bench.echo.set_distance(100.0);

    let stop_pin = MockPin::with_level(true);
    let shutdown = PinShutdown(stop_pin.clone());

    bench.robot.step(bench.clock.now());
    assert!(bench.duties().iter().all(|d| *d == 100.0));

    stop_pin.set_level(false);
    let mut clock = bench.clock.clone();
    assert_eq!(bench.robot.run(&mut clock, &shutdown), 0);

    assert_eq!(bench.robot.phase(), LoopPhase::Released);
    for pwm in &bench.pwms {
        assert_eq!(pwm.duty(), 0.0);
        assert!(!pwm.is_running());
    }
    assert!(!bench.led.level());
}

#[test]
fn test_cleanup_after_partial_setup() {
    let pwms = [
        MockPwm::new(),
        MockPwm::failing(),
        MockPwm::new(),
        MockPwm::failing(),
    ];
    let mut bench = Bench::with_pwms(&RobotConfig::default(), pwms);
    bench.press(1);
    bench.echo.set_distance(100.0);

    let now = bench.clock.now();
    bench.robot.step(now);
    assert_eq!(bench.pwms[0].duty(), 100.0);
    assert_eq!(bench.pwms[1].duty(), 0.0);

    bench.robot.shutdown();
    bench.robot.shutdown();

    for (pwm, channel) in bench.pwms.iter().zip(MotorChannel::ALL) {
        assert_eq!(pwm.duty(), 0.0, "{:?}", channel);
        assert!(!pwm.is_running(), "{:?}", channel);
        assert!(!bench.robot.motion().is_bound(channel));
    }
}

#[test]
fn test_shutdown_before_setup_never_starts_pwm() {
    let mut bench = Bench::new(&RobotConfig::default());
    bench.robot.shutdown();

    assert_eq!(bench.robot.phase(), LoopPhase::Released);
    for pwm in &bench.pwms {
        assert_eq!(pwm.start_count(), 0);
        assert!(!pwm.is_running());
    }
    assert!(!bench.led.level());
}

#[test]
fn test_drop_mid_run_cleans_up() {
    let bench = Bench::new(&RobotConfig::default());
    bench.press(2);
    bench.echo.set_distance(100.0);
    let pwms = bench.pwms.clone();
    let led = bench.led.clone();

    {
        let mut robot = bench.robot;
        robot.step(Instant::from_millis(0));
        assert!(pwms.iter().all(|p| approx(p.duty(), 47.06)));
    }

    for pwm in &pwms {
        assert_eq!(pwm.duty(), 0.0);
        assert!(!pwm.is_running());
        assert_eq!(pwm.stop_count(), 1);
    }
    assert!(!led.level());
}

/// Active-low shutdown button
struct PinShutdown(MockPin);

impl ShutdownSignal for PinShutdown {
    fn is_requested(&self) -> bool {
        self.0.is_low()
    }
}
