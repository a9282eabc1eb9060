//! pH sensor sources.
//!
//! No probe protocol is implemented.  [`NoPhSensor`] is the default and
//! always reports "absent", which sends the pH policy down the coverage
//! hysteresis path.  [`FixedPhReading`] carries a value the operator
//! measured by hand.

use crate::app::ports::PhSensorPort;

/// Plausible pH scale.
pub const PH_RANGE: core::ops::RangeInclusive<f32> = 0.0..=14.0;

/// Drop readings that cannot be a pH value.
pub fn sanitize(reading: Option<f32>) -> Option<f32> {
    reading.filter(|v| v.is_finite() && PH_RANGE.contains(v))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoPhSensor;

impl PhSensorPort for NoPhSensor {
    fn read_ph(&mut self) -> Option<f32> {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedPhReading(pub f32);

impl PhSensorPort for FixedPhReading {
    fn read_ph(&mut self) -> Option<f32> {
        sanitize(Some(self.0))
    }
}
