//! Report aggregator.
//!
//! Once per [`REPORT_PERIOD_MS`] the aggregator raises both request
//! signals, then collects exactly two [`PeripheralReport`]s. Asking both
//! samplers before waiting lets them prepare concurrently, so a cycle
//! waits for the slower one rather than for both in turn.
//!
//! Reports are merged by source tag, never by arrival order. The fused
//! report persists across cycles: a field that is not refreshed keeps its
//! previous value.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Ticker};

use crate::channels::AggregatorPort;
use crate::config::REPORT_PERIOD_MS;
use crate::hid::MouseReport;
use crate::report::{PeripheralReport, ReportSource};
use crate::sensor::ButtonReader;

/// Reports expected per cycle, one per sampler.
pub const REPORTS_PER_CYCLE: usize = 2;

/// Sources already merged in the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Seen {
    touch: bool,
    accel: bool,
}

impl Seen {
    /// Mark `source`; `false` if it was already marked.
    fn mark(&mut self, source: ReportSource) -> bool {
        let slot = match source {
            ReportSource::Touch => &mut self.touch,
            ReportSource::Accel => &mut self.accel,
        };
        !core::mem::replace(slot, true)
    }

    pub fn complete(&self) -> bool {
        self.touch && self.accel
    }
}

pub struct Aggregator<B> {
    buttons: B,
    current: MouseReport,
    cycles: u32,
}

impl<B: ButtonReader> Aggregator<B> {
    pub fn new(buttons: B) -> Self {
        Self {
            buttons,
            current: MouseReport::empty(),
            cycles: 0,
        }
    }

    /// Fold one peripheral report into the report under construction.
    ///
    /// A second report from a source already merged this cycle is logged
    /// and dropped; the first one stands.
    pub fn merge(&mut self, report: PeripheralReport, seen: &mut Seen) {
        if !seen.mark(report.source()) {
            warn!("Duplicate {:?} report in cycle {}", report.source(), self.cycles);
            return;
        }
        match report {
            PeripheralReport::Touch { scroll } => self.current.scroll = scroll,
            PeripheralReport::Accel { x, y } => {
                self.current.x = x;
                self.current.y = y;
            }
        }
    }

    /// Run one report cycle and return what was published.
    pub async fn cycle<M: RawMutex>(&mut self, port: &AggregatorPort<'_, M>) -> MouseReport {
        port.request_all();

        let mut seen = Seen::default();
        for _ in 0..REPORTS_PER_CYCLE {
            let report = port.receive().await;
            self.merge(report, &mut seen);
        }

        self.current.buttons = self.buttons.read();
        port.publish(self.current);
        self.cycles = self.cycles.wrapping_add(1);

        trace!("Mouse report: {:?}", self.current);
        self.current
    }

    pub fn current(&self) -> MouseReport {
        self.current
    }

    /// Completed cycles since start.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// One cycle per tick, forever.
    pub async fn run<M: RawMutex>(mut self, port: AggregatorPort<'_, M>) -> ! {
        let mut ticker = Ticker::every(Duration::from_millis(REPORT_PERIOD_MS));
        info!("Aggregator started ({} ms cycle)", REPORT_PERIOD_MS);
        loop {
            self.cycle(&port).await;
            ticker.next().await;
        }
    }
}
