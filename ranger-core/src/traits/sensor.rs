//! Distance sensor trait

use crate::sensor::DistanceReading;

/// Source of obstacle distance readings
///
/// `measure` never fails: a sensor that times out or is not fitted
/// returns [`DistanceReading::timeout`].
pub trait DistanceSensor {
    /// Run one ranging cycle
    fn measure(&mut self) -> DistanceReading;
}
