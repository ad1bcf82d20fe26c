//! Accelerometer tilt sampler.
//!
//! Reads X/Y every [`ACCEL_SAMPLE_PERIOD_MS`], scales each axis by an
//! arithmetic shift of [`ACCEL_SCALE_SHIFT`] bits and clamps it to the HID
//! range. On request the latest scaled sample goes to the aggregator.
//!
//! A failed bus read keeps the previous sample; the pointer holds still
//! for at most a cycle instead of jumping to zero.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;

use crate::channels::SamplerPort;
use crate::config::{ACCEL_SAMPLE_PERIOD_MS, ACCEL_SCALE_SHIFT};
use crate::error::SensorError;
use crate::report::{clamp_axis, PeripheralReport};
use crate::sensor::Accelerometer;

/// Map one raw axis into the HID range.
///
/// `i16 >> 8` spans -128..=127; only -128 is touched by the clamp.
pub fn scale_axis(raw: i16) -> i8 {
    clamp_axis(i32::from(raw) >> ACCEL_SCALE_SHIFT)
}

/// State owned by the accelerometer sampling task.
#[derive(Debug, Default)]
pub struct AccelSampler {
    x: i8,
    y: i8,
    read_errors: u32,
}

impl AccelSampler {
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            read_errors: 0,
        }
    }

    /// Fold one read result into the latest sample.
    pub fn sample(&mut self, reading: Result<(i16, i16), SensorError>) {
        match reading {
            Ok((x, y)) => {
                self.x = scale_axis(x);
                self.y = scale_axis(y);
            }
            Err(e) => {
                self.read_errors = self.read_errors.wrapping_add(1);
                debug!("Accel read failed: {:?}", e);
            }
        }
    }

    pub fn take_report(&self) -> PeripheralReport {
        PeripheralReport::Accel { x: self.x, y: self.y }
    }

    pub fn latest(&self) -> (i8, i8) {
        (self.x, self.y)
    }

    /// Failed reads since start.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// Sample forever, answering aggregator requests as they come.
    pub async fn run<A: Accelerometer, M: RawMutex>(mut self, mut sensor: A, port: SamplerPort<'_, M>) -> ! {
        let period = Duration::from_millis(ACCEL_SAMPLE_PERIOD_MS);
        info!("Accel sampler started");
        loop {
            let reading = sensor.read_raw().await;
            self.sample(reading);

            if port.wait_request(period).await {
                let report = self.take_report();
                trace!("Accel report: {:?}", report);
                port.deliver(report).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_arithmetic_shift() {
        assert_eq!(scale_axis(0), 0);
        assert_eq!(scale_axis(255), 0);
        assert_eq!(scale_axis(256), 1);
        assert_eq!(scale_axis(100 << 8), 100);
        // Arithmetic shift rounds toward negative infinity.
        assert_eq!(scale_axis(-1), -1);
        assert_eq!(scale_axis(-256), -1);
        assert_eq!(scale_axis(-257), -2);
        assert_eq!(scale_axis(-50 << 8), -50);
    }

    #[test]
    fn scale_saturates_at_symmetric_range() {
        assert_eq!(scale_axis(i16::MAX), 127);
        assert_eq!(scale_axis(i16::MIN), -127);
        assert_eq!(scale_axis(-127 << 8), -127);
    }

    #[test]
    fn report_carries_latest_sample() {
        let mut s = AccelSampler::new();
        assert_eq!(s.take_report(), PeripheralReport::Accel { x: 0, y: 0 });

        s.sample(Ok((100 << 8, -(50 << 8))));
        assert_eq!(s.take_report(), PeripheralReport::Accel { x: 100, y: -50 });

        // Reporting does not consume the sample.
        assert_eq!(s.take_report(), PeripheralReport::Accel { x: 100, y: -50 });
    }

    #[test]
    fn failed_read_keeps_previous_sample() {
        let mut s = AccelSampler::new();
        s.sample(Ok((20 << 8, 30 << 8)));
        s.sample(Err(SensorError::Bus));
        s.sample(Err(SensorError::NotPresent));
        assert_eq!(s.latest(), (20, 30));
        assert_eq!(s.read_errors(), 2);

        s.sample(Ok((0, 0)));
        assert_eq!(s.latest(), (0, 0));
    }
}
