//! Reports exchanged between the samplers and the aggregator.

use crate::config::{HID_AXIS_MAX, HID_AXIS_MIN};

/// Which sampler produced a [`PeripheralReport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportSource {
    Touch,
    Accel,
}

/// One sampler's contribution to a report cycle.
///
/// Created by a sampler on request and consumed once by the aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralReport {
    /// Scroll distance since the previous request.
    Touch { scroll: i8 },
    /// Latest scaled tilt.
    Accel { x: i8, y: i8 },
}

impl PeripheralReport {
    pub fn source(&self) -> ReportSource {
        match self {
            PeripheralReport::Touch { .. } => ReportSource::Touch,
            PeripheralReport::Accel { .. } => ReportSource::Accel,
        }
    }
}

/// Saturate a computed delta into the symmetric HID axis range.
pub fn clamp_axis(value: i32) -> i8 {
    // Both bounds fit in i8, so the cast is exact.
    value.clamp(i32::from(HID_AXIS_MIN), i32::from(HID_AXIS_MAX)) as i8
}
