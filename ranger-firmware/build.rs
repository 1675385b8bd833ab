//! Build script for ranger-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates robot.toml at compile time

use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys each section accepts
const SECTIONS: &[(&str, &[&str])] = &[
    ("sensor", &["pin"]),
    ("buttons", &["fast", "slow", "stop", "demo"]),
    ("motors", &["m1", "m2", "m3", "m4", "frequency_hz"]),
    ("indicator", &["pin"]),
    ("shutdown", &["pin"]),
    ("control", &["safety_threshold_cm", "loop_delay_ms", "demo_clock"]),
];

/// Keys holding pin strings
const PIN_KEYS: &[&str] = &["pin", "fast", "slow", "stop", "demo", "m1", "m2", "m3", "m4"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate robot.toml configuration at compile time
fn validate_config() {
    // Re-run if robot.toml changes
    println!("cargo:rerun-if-changed=robot.toml");

    let config_path = Path::new("robot.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: robot.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds robot.toml at build time.                   ║\n\
            ║  Please create one in the ranger-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read robot.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in robot.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_control(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid robot configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=robot.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections and keys; the firmware parser rejects anything else
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("robot.toml must be a table".to_string());
        return;
    };

    for (section, body) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(name, _)| *name == section.as_str()) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(table) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }
}

/// Pin strings parse, fit the RP2040 and are not shared
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let mut used: HashMap<u8, String> = HashMap::new();
    let mut slices: HashMap<u8, String> = HashMap::new();

    for (section, _) in SECTIONS {
        let Some(table) = config.get(section).and_then(|s| s.as_table()) else {
            continue;
        };
        for (key, value) in table {
            if !PIN_KEYS.contains(&key.as_str()) {
                continue;
            }
            let owner = format!("[{}] {}", section, key);
            let Some(text) = value.as_str() else {
                errors.push(format!("{} must be a string", owner));
                continue;
            };
            if text == "none" {
                continue;
            }
            let Some(pin) = parse_pin(text) else {
                errors.push(format!("{} invalid pin '{}'", owner, text));
                continue;
            };
            if let Some(other) = used.insert(pin, owner.clone()) {
                errors.push(format!("gpio{} used by {} and {}", pin, other, owner));
            }
            if *section == "motors" {
                let slice = (pin / 2) % 8;
                if let Some(other) = slices.insert(slice, owner.clone()) {
                    errors.push(format!("{} shares PWM slice {} with {}", owner, slice, other));
                }
            }
        }
    }
}

/// Tuning values are in range
fn validate_control(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(value) = config.get("control").and_then(|c| c.get("safety_threshold_cm")) {
        let threshold = value
            .as_float()
            .or_else(|| value.as_integer().map(|i| i as f64));
        match threshold {
            Some(t) if t > 0.0 => {}
            _ => errors.push("[control] safety_threshold_cm must be > 0".to_string()),
        }
    }

    if let Some(value) = config.get("control").and_then(|c| c.get("loop_delay_ms")) {
        if !matches!(value.as_integer(), Some(ms) if ms > 0 && ms <= u32::MAX as i64) {
            errors.push("[control] loop_delay_ms must be a positive integer".to_string());
        }
    }

    if let Some(value) = config.get("control").and_then(|c| c.get("demo_clock")) {
        if !matches!(value.as_str(), Some("free_running" | "pause_on_override")) {
            errors.push(
                "[control] demo_clock must be 'free_running' or 'pause_on_override'".to_string(),
            );
        }
    }

    if let Some(value) = config.get("motors").and_then(|m| m.get("frequency_hz")) {
        if !matches!(value.as_integer(), Some(hz) if (8..=1_000_000).contains(&hz)) {
            errors.push("[motors] frequency_hz must be 8-1000000".to_string());
        }
    }
}

/// Parse "gpio7", "^gpio8", "!gpio8", "!^gpio8"
fn parse_pin(s: &str) -> Option<u8> {
    let pin: u8 = s
        .trim_start_matches(['!', '^'])
        .strip_prefix("gpio")?
        .parse()
        .ok()?;
    (pin < 30).then_some(pin)
}
