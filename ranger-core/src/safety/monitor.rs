//! Safety monitor implementation
//!
//! Compares each distance reading against the stopping threshold.

use crate::motion::MotionCommand;
use crate::sensor::DistanceReading;

/// Default stopping distance
pub const DEFAULT_THRESHOLD_CM: f32 = 20.0;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// Nothing inside the threshold (or no valid reading)
    Clear,
    /// Obstacle inside the threshold; motion must stop
    Obstacle {
        /// Measured distance
        distance_cm: f32,
    },
}

impl SafetyStatus {
    /// Check if the override is active
    pub fn is_override(&self) -> bool {
        matches!(self, SafetyStatus::Obstacle { .. })
    }

    /// Apply the override to the command the mode asked for
    pub fn gate(&self, requested: MotionCommand) -> MotionCommand {
        match self {
            SafetyStatus::Clear => requested,
            SafetyStatus::Obstacle { .. } => MotionCommand::Stop,
        }
    }
}

/// Safety monitor for obstacle detection
///
/// A timed-out reading is "no obstacle": a sensor that hears nothing is
/// indistinguishable from open space.
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    /// Stopping distance
    threshold_cm: f32,
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_CM)
    }
}

impl SafetyMonitor {
    /// Create a monitor with the given stopping distance
    pub const fn new(threshold_cm: f32) -> Self {
        Self { threshold_cm }
    }

    /// Stopping distance
    pub fn threshold_cm(&self) -> f32 {
        self.threshold_cm
    }

    /// Check one reading
    pub fn check(&self, reading: &DistanceReading) -> SafetyStatus {
        match reading.distance_cm() {
            Some(distance_cm) if distance_cm < self.threshold_cm => {
                SafetyStatus::Obstacle { distance_cm }
            }
            _ => SafetyStatus::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_obstacle_inside_threshold() {
        let monitor = SafetyMonitor::new(20.0);
        let status = monitor.check(&DistanceReading::valid(15.0));
        assert_eq!(status, SafetyStatus::Obstacle { distance_cm: 15.0 });
        assert!(status.is_override());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let monitor = SafetyMonitor::new(20.0);
        assert_eq!(
            monitor.check(&DistanceReading::valid(20.0)),
            SafetyStatus::Clear
        );
        assert_eq!(
            monitor.check(&DistanceReading::valid(25.0)),
            SafetyStatus::Clear
        );
    }

    #[test]
    fn test_timeout_is_clear() {
        let monitor = SafetyMonitor::default();
        assert_eq!(monitor.check(&DistanceReading::timeout()), SafetyStatus::Clear);
    }

    #[test]
    fn test_zero_distance_stops() {
        // A valid zero means something is touching the sensor
        let monitor = SafetyMonitor::default();
        assert!(monitor.check(&DistanceReading::valid(0.0)).is_override());
    }

    proptest! {
        #[test]
        fn prop_override_forces_stop(distance in 0.0f32..20.0, mode_cmd in 0u8..3) {
            let requested = match mode_cmd {
                0 => MotionCommand::Stop,
                1 => MotionCommand::Fast,
                _ => MotionCommand::Slow,
            };
            let status = SafetyMonitor::new(20.0).check(&DistanceReading::valid(distance));
            prop_assert_eq!(status.gate(requested), MotionCommand::Stop);
        }

        #[test]
        fn prop_clear_passes_command(distance in 20.0f32..500.0, valid in any::<bool>()) {
            let reading = if valid { DistanceReading::valid(distance) } else { DistanceReading::timeout() };
            let status = SafetyMonitor::new(20.0).check(&reading);
            prop_assert_eq!(status.gate(MotionCommand::Fast), MotionCommand::Fast);
            prop_assert_eq!(status.gate(MotionCommand::Slow), MotionCommand::Slow);
        }
    }
}
