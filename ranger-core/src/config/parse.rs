//! Simple TOML parser for robot configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! Ranger configuration. It does NOT support the full TOML spec, and it
//! needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! Recognised layout:
//!
//! ```toml
//! [sensor]
//! pin = "gpio7"
//!
//! [buttons]
//! fast = "!^gpio8"
//! slow = "!^gpio9"
//! stop = "!^gpio10"
//! demo = "!^gpio12"
//!
//! [motors]
//! m1 = "gpio3"
//! m2 = "gpio5"
//! m3 = "gpio6"
//! m4 = "gpio11"
//! frequency_hz = 1000
//!
//! [indicator]
//! pin = "gpio0"
//!
//! [shutdown]
//! pin = "none"
//!
//! [control]
//! safety_threshold_cm = 20.0
//! loop_delay_ms = 50
//! demo_clock = "free_running"   # or "pause_on_override"
//! ```
//!
//! Keys that are not given keep their [`RobotConfig::default`] value.

use super::hardware::{PinConfig, RobotConfig, GPIO_COUNT};
use crate::state::DemoClockPolicy;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Invalid or unknown section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// Line is neither a header nor key = value
    Malformed,
}

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: u32,
    pub kind: ParseErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sensor,
    Buttons,
    Motors,
    Indicator,
    Shutdown,
    Control,
}

/// Parse TOML configuration into RobotConfig
pub fn parse_config(input: &str) -> Result<RobotConfig, ParseError> {
    let mut config = RobotConfig::new();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index as u32 + 1;
        let err = |kind| ParseError {
            line: line_no,
            kind,
        };

        let line = strip_comment(raw).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1]).map_err(err)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(err(ParseErrorKind::Malformed))?;
        apply_value(section, key, value, &mut config).map_err(err)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseErrorKind> {
    match header.trim() {
        "sensor" => Ok(Section::Sensor),
        "buttons" => Ok(Section::Buttons),
        "motors" => Ok(Section::Motors),
        "indicator" => Ok(Section::Indicator),
        "shutdown" => Ok(Section::Shutdown),
        "control" => Ok(Section::Control),
        _ => Err(ParseErrorKind::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RobotConfig,
) -> Result<(), ParseErrorKind> {
    match (section, key) {
        (Section::Sensor, "pin") => config.sensor_pin = parse_optional_pin(value)?,

        (Section::Buttons, "fast") => config.button_pins[0] = parse_optional_pin(value)?,
        (Section::Buttons, "slow") => config.button_pins[1] = parse_optional_pin(value)?,
        (Section::Buttons, "stop") => config.button_pins[2] = parse_optional_pin(value)?,
        (Section::Buttons, "demo") => config.button_pins[3] = parse_optional_pin(value)?,

        (Section::Motors, "m1") => config.motor_pins[0] = parse_optional_pin(value)?,
        (Section::Motors, "m2") => config.motor_pins[1] = parse_optional_pin(value)?,
        (Section::Motors, "m3") => config.motor_pins[2] = parse_optional_pin(value)?,
        (Section::Motors, "m4") => config.motor_pins[3] = parse_optional_pin(value)?,
        (Section::Motors, "frequency_hz") => config.pwm_frequency_hz = parse_int(value)?,

        (Section::Indicator, "pin") => config.indicator_pin = parse_optional_pin(value)?,
        (Section::Shutdown, "pin") => config.shutdown_pin = parse_optional_pin(value)?,

        (Section::Control, "safety_threshold_cm") => {
            config.safety_threshold_cm = parse_float(value)?
        }
        (Section::Control, "loop_delay_ms") => config.loop_delay_ms = parse_int(value)?,
        (Section::Control, "demo_clock") => {
            config.demo_clock = match parse_string(value) {
                "free_running" => DemoClockPolicy::FreeRunning,
                "pause_on_override" => DemoClockPolicy::PauseOnOverride,
                _ => return Err(ParseErrorKind::InvalidValue),
            }
        }

        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing comment, ignoring `#` inside quotes
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        // Allow unquoted strings for simple values
        .unwrap_or(value)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseErrorKind> {
    value.parse().map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a float value (integers accepted)
fn parse_float(value: &str) -> Result<f32, ParseErrorKind> {
    value.parse().map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a pin value, where "none" means not fitted
fn parse_optional_pin(value: &str) -> Result<Option<PinConfig>, ParseErrorKind> {
    match parse_string(value) {
        "none" | "" => Ok(None),
        s => parse_pin_string(s)
            .map(Some)
            .ok_or(ParseErrorKind::InvalidPin),
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio11" -> pin 11
/// - "!gpio12" -> pin 12, inverted (active-low)
/// - "^gpio4" -> pin 4 with pull-up
/// - "!^gpio8" -> pin 8, active-low with pull-up
pub fn parse_pin_string(s: &str) -> Option<PinConfig> {
    let mut rest = s.trim();
    let mut config = PinConfig::default();

    loop {
        if let Some(r) = rest.strip_prefix('!') {
            config.inverted = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('^') {
            config.pull_up = true;
            rest = r;
        } else {
            break;
        }
    }

    let pin: u8 = rest.strip_prefix("gpio")?.parse().ok()?;
    if pin >= GPIO_COUNT {
        return None;
    }
    config.pin = pin;

    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Ranger wiring
[sensor]
pin = "gpio7"

[buttons]
fast = "!^gpio8"
slow = "!^gpio9"
stop = "!^gpio10"
demo = "none"          # demo button not fitted

[motors]
m1 = "gpio3"
m2 = "gpio5"
m3 = "gpio6"
m4 = "gpio11"
frequency_hz = 2000

[indicator]
pin = "gpio25"

[shutdown]
pin = "!^gpio13"

[control]
safety_threshold_cm = 25.5
loop_delay_ms = 40
demo_clock = "pause_on_override"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.sensor_pin, Some(PinConfig::new(7)));
        assert_eq!(config.button_pins[0], Some(PinConfig::button(8)));
        assert_eq!(config.button_pins[2], Some(PinConfig::button(10)));
        assert_eq!(config.button_pins[3], None);
        assert_eq!(config.motor_pins[3], Some(PinConfig::new(11)));
        assert_eq!(config.indicator_pin, Some(PinConfig::new(25)));
        assert_eq!(config.shutdown_pin, Some(PinConfig::button(13)));
        assert_eq!(config.pwm_frequency_hz, 2000);
        assert_eq!(config.safety_threshold_cm, 25.5);
        assert_eq!(config.loop_delay_ms, 40);
        assert_eq!(config.demo_clock, DemoClockPolicy::PauseOnOverride);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), RobotConfig::default());
        assert_eq!(
            parse_config("# only a comment\n\n").unwrap(),
            RobotConfig::default()
        );
    }

    #[test]
    fn test_integer_threshold_accepted() {
        let config = parse_config("[control]\nsafety_threshold_cm = 30\n").unwrap();
        assert_eq!(config.safety_threshold_cm, 30.0);
    }

    #[test]
    fn test_errors_carry_line() {
        let err = parse_config("[sensor]\npin = \"gpio7\"\n[lcd]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 3,
                kind: ParseErrorKind::InvalidSection
            }
        );

        let err = parse_config("[motors]\nm5 = \"gpio1\"\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownKey);
        assert_eq!(err.line, 2);

        let err = parse_config("[motors]\nfrequency_hz = fast\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[sensor]\npin = \"pin7\"\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPin);

        let err = parse_config("[sensor]\njust some words\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Malformed);
    }

    #[test]
    fn test_keys_outside_sections_rejected() {
        let err = parse_config("pin = \"gpio7\"\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownKey);
    }

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(parse_pin_string("gpio11"), Some(PinConfig::new(11)));
        assert_eq!(parse_pin_string("!gpio12"), Some(PinConfig::inverted(12)));
        assert_eq!(parse_pin_string("^gpio4"), Some(PinConfig::with_pullup(4)));
        assert_eq!(parse_pin_string("^!gpio4"), Some(PinConfig::button(4)));
        assert_eq!(parse_pin_string("gpio0"), Some(PinConfig::new(0)));
        assert_eq!(parse_pin_string("gpio29"), Some(PinConfig::new(29)));

        // Invalid
        assert_eq!(parse_pin_string("gpio30"), None);
        assert_eq!(parse_pin_string("pin11"), None);
        assert_eq!(parse_pin_string(""), None);
    }

    #[test]
    fn test_hash_inside_string_kept() {
        assert_eq!(strip_comment(r#"a = "x#y" # note"#), r#"a = "x#y" "#);
    }
}
