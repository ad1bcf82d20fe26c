//! Touch strip scroll sampler.
//!
//! Runs every [`TOUCH_SAMPLE_PERIOD_MS`]:
//!
//! 1. Classify the calibrated reading. Only readings strictly inside
//!    (`TOUCH_LOW_THRESHOLD`, `TOUCH_HIGH_THRESHOLD`) are contact; anything
//!    else is fed to the filter as 0 and restarts the debounce count.
//! 2. Smooth through a [`MovingAverageFilter`].
//! 3. Once `TOUCH_MIN_CONSECUTIVE` in-band samples were seen, add the
//!    frame-to-frame change of the smoothed value to the scroll distance,
//!    unless it is at least `TOUCH_MAX_PLAUSIBLE_JUMP` (landing/lift-off).
//! 4. When the aggregator asks, hand over `distance / TOUCH_SCROLL_DIVISOR`
//!    clamped to the HID range and start accumulating from zero.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;

use crate::channels::SamplerPort;
use crate::config::{
    TOUCH_HIGH_THRESHOLD, TOUCH_LOW_THRESHOLD, TOUCH_MAX_PLAUSIBLE_JUMP, TOUCH_MIN_CONSECUTIVE,
    TOUCH_SAMPLE_PERIOD_MS, TOUCH_SCROLL_DIVISOR,
};
use crate::filter::MovingAverageFilter;
use crate::report::{clamp_axis, PeripheralReport};
use crate::sensor::TouchSensor;

/// Contact tracking between two reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchTracking {
    /// Last reading was in the contact band.
    pub touched: bool,
    /// In-band samples in a row, saturating at the debounce count.
    pub consecutive: u8,
    /// Smoothed distance travelled since the last report.
    pub distance: i32,
}

/// `true` iff `raw` lies strictly inside the contact band.
pub fn is_contact(raw: u16) -> bool {
    TOUCH_LOW_THRESHOLD < raw && raw < TOUCH_HIGH_THRESHOLD
}

/// State owned by the touch sampling task.
pub struct TouchScrollSampler {
    filter: MovingAverageFilter,
    previous: i16,
    tracking: TouchTracking,
}

impl TouchScrollSampler {
    pub const fn new() -> Self {
        Self {
            filter: MovingAverageFilter::new(),
            previous: 0,
            tracking: TouchTracking {
                touched: false,
                consecutive: 0,
                distance: 0,
            },
        }
    }

    /// Process one reading. Returns the smoothed value.
    pub fn sample(&mut self, raw: u16) -> i16 {
        let touched = is_contact(raw);
        let input = if touched {
            if self.tracking.consecutive < TOUCH_MIN_CONSECUTIVE {
                self.tracking.consecutive += 1;
            }
            // In-band readings are below TOUCH_HIGH_THRESHOLD.
            i16::try_from(raw).unwrap_or(i16::MAX)
        } else {
            self.tracking.consecutive = 0;
            0
        };

        let smoothed = self.filter.insert_sample(input);

        if self.tracking.consecutive >= TOUCH_MIN_CONSECUTIVE {
            let diff = i32::from(smoothed) - i32::from(self.previous);
            if diff.abs() < TOUCH_MAX_PLAUSIBLE_JUMP {
                self.tracking.distance = self.tracking.distance.saturating_add(diff);
            }
        }

        self.previous = smoothed;
        self.tracking.touched = touched;
        smoothed
    }

    /// Drain the accumulated distance into a report.
    pub fn take_report(&mut self) -> PeripheralReport {
        let scroll = clamp_axis(self.tracking.distance / TOUCH_SCROLL_DIVISOR);
        self.tracking.distance = 0;
        self.tracking.touched = false;
        PeripheralReport::Touch { scroll }
    }

    pub fn tracking(&self) -> TouchTracking {
        self.tracking
    }

    pub fn accumulated_distance(&self) -> i32 {
        self.tracking.distance
    }

    pub fn filtered(&self) -> i16 {
        self.filter.current_value()
    }

    /// Sample forever, answering aggregator requests as they come.
    ///
    /// The request wait doubles as the sampling delay: a cycle without a
    /// request simply times out and samples again.
    pub async fn run<T: TouchSensor, M: RawMutex>(mut self, mut sensor: T, port: SamplerPort<'_, M>) -> ! {
        let period = Duration::from_millis(TOUCH_SAMPLE_PERIOD_MS);
        info!("Touch sampler started");
        loop {
            let raw = sensor.read_raw().await;
            self.sample(raw);

            if port.wait_request(period).await {
                let report = self.take_report();
                trace!("Touch report: {:?}", report);
                port.deliver(report).await;
            }
        }
    }
}

impl Default for TouchScrollSampler {
    fn default() -> Self {
        Self::new()
    }
}
