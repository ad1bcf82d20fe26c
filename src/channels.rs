//! Inter-task plumbing.
//!
//! ```text
//!  TouchScrollSampler --\                       /-- touch_request
//!                        >-- reports (depth 2) --> Aggregator --> mouse (1 slot) --> HidSender
//!  AccelSampler -------/                        \-- accel_request
//! ```
//!
//! All queues and signals live in one [`Channels`] value created at
//! startup. Tasks only see the handles they need.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};

use crate::config::PERIPHERAL_QUEUE_DEPTH;
use crate::hid::MouseReport;
use crate::report::PeripheralReport;

/// Every queue and signal of the pipeline.
pub struct Channels<M: RawMutex> {
    /// Samplers -> aggregator. Holds one report per producer.
    reports: Channel<M, PeripheralReport, PERIPHERAL_QUEUE_DEPTH>,
    touch_request: Signal<M, ()>,
    accel_request: Signal<M, ()>,
    /// Aggregator -> sender. A newer report replaces an unconsumed one.
    mouse: Signal<M, MouseReport>,
}

impl<M: RawMutex> Channels<M> {
    pub const fn new() -> Self {
        Self {
            reports: Channel::new(),
            touch_request: Signal::new(),
            accel_request: Signal::new(),
            mouse: Signal::new(),
        }
    }

    pub fn touch_port(&self) -> SamplerPort<'_, M> {
        SamplerPort {
            request: &self.touch_request,
            reports: self.reports.sender(),
        }
    }

    pub fn accel_port(&self) -> SamplerPort<'_, M> {
        SamplerPort {
            request: &self.accel_request,
            reports: self.reports.sender(),
        }
    }

    pub fn aggregator_port(&self) -> AggregatorPort<'_, M> {
        AggregatorPort {
            touch_request: &self.touch_request,
            accel_request: &self.accel_request,
            reports: self.reports.receiver(),
            output: &self.mouse,
        }
    }

    /// Consumer side of the single-slot output.
    pub fn mouse(&self) -> &Signal<M, MouseReport> {
        &self.mouse
    }
}

impl<M: RawMutex> Default for Channels<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sampler's view: its own request signal and the shared report queue.
pub struct SamplerPort<'a, M: RawMutex> {
    request: &'a Signal<M, ()>,
    reports: Sender<'a, M, PeripheralReport, PERIPHERAL_QUEUE_DEPTH>,
}

impl<'a, M: RawMutex> SamplerPort<'a, M> {
    /// Consume a pending request without waiting.
    pub fn take_request(&self) -> bool {
        self.request.try_take().is_some()
    }

    /// Wait up to `period` for a request. Doubles as the sampling delay.
    pub async fn wait_request(&self, period: Duration) -> bool {
        with_timeout(period, self.request.wait()).await.is_ok()
    }

    /// Wait for a request with no timeout.
    pub async fn requested(&self) {
        self.request.wait().await
    }

    /// Queue a report, waiting for room if the aggregator is behind.
    pub async fn deliver(&self, report: PeripheralReport) {
        self.reports.send(report).await
    }
}

/// The aggregator's view: both request signals, the report queue and the
/// output slot.
pub struct AggregatorPort<'a, M: RawMutex> {
    touch_request: &'a Signal<M, ()>,
    accel_request: &'a Signal<M, ()>,
    reports: Receiver<'a, M, PeripheralReport, PERIPHERAL_QUEUE_DEPTH>,
    output: &'a Signal<M, MouseReport>,
}

impl<'a, M: RawMutex> AggregatorPort<'a, M> {
    /// Ask both samplers for a report. Never blocks.
    pub fn request_all(&self) {
        self.touch_request.signal(());
        self.accel_request.signal(());
    }

    pub async fn receive(&self) -> PeripheralReport {
        self.reports.receive().await
    }

    /// Overwrite the output slot.
    pub fn publish(&self, report: MouseReport) {
        self.output.signal(report);
    }
}
