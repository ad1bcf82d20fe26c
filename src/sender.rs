//! HID report forwarding task - waits for the freshest fused report and
//! writes it to the transport.
//!
//! A failed write is dropped, not retried: the next cycle's report
//! supersedes it within [`REPORT_PERIOD_MS`](crate::config::REPORT_PERIOD_MS).

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::error::TransportError;
use crate::hid::MouseReport;
use crate::sensor::HidTransport;

pub struct HidSender<T> {
    transport: T,
    sent: u32,
    dropped: u32,
    link_up: bool,
}

impl<T: HidTransport> HidSender<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            dropped: 0,
            link_up: true,
        }
    }

    /// Hand one report to the transport.
    pub async fn forward(&mut self, report: MouseReport) -> Result<(), TransportError> {
        match self.transport.send(&report).await {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                if !self.link_up {
                    info!("HID link back after {} dropped reports", self.dropped);
                    self.link_up = true;
                }
                Ok(())
            }
            Err(e) => {
                self.dropped = self.dropped.wrapping_add(1);
                if self.link_up {
                    warn!("HID write failed: {:?}", e);
                    self.link_up = false;
                } else {
                    debug!("HID report dropped: {:?}", e);
                }
                Err(e)
            }
        }
    }

    /// Reports the transport accepted.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Reports the transport refused.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Forward every published report, forever.
    pub async fn run<M: RawMutex>(mut self, reports: &Signal<M, MouseReport>) -> ! {
        info!("HID sender started - waiting for reports");
        loop {
            let report = reports.wait().await;
            // Failures are accounted in `forward`; nothing to retry.
            let _ = self.forward(report).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::Buttons;
    use embassy_futures::block_on;
    use heapless::Vec;

    /// Records accepted reports; refuses while `ready` is false.
    struct Recorder {
        ready: bool,
        log: Vec<MouseReport, 8>,
    }

    impl HidTransport for Recorder {
        async fn send(&mut self, report: &MouseReport) -> Result<(), TransportError> {
            if !self.ready {
                return Err(TransportError::NotReady);
            }
            self.log.push(*report).map_err(|_| TransportError::Overflow)
        }
    }

    fn report(x: i8) -> MouseReport {
        MouseReport {
            x,
            y: 0,
            scroll: 0,
            buttons: Buttons::NONE,
        }
    }

    #[test]
    fn forwards_when_ready() {
        let mut sender = HidSender::new(Recorder { ready: true, log: Vec::new() });
        assert_eq!(block_on(sender.forward(report(1))), Ok(()));
        assert_eq!(block_on(sender.forward(report(2))), Ok(()));
        assert_eq!(sender.sent(), 2);
        assert_eq!(sender.dropped(), 0);
        assert_eq!(sender.transport().log.as_slice(), &[report(1), report(2)]);
    }

    #[test]
    fn failed_write_is_dropped_not_retried() {
        let mut sender = HidSender::new(Recorder { ready: false, log: Vec::new() });
        assert_eq!(block_on(sender.forward(report(1))), Err(TransportError::NotReady));
        assert_eq!(block_on(sender.forward(report(2))), Err(TransportError::NotReady));
        assert_eq!(sender.dropped(), 2);

        sender.transport.ready = true;
        assert_eq!(block_on(sender.forward(report(3))), Ok(()));
        // Only the fresh report went out; nothing was queued for replay.
        assert_eq!(sender.transport().log.as_slice(), &[report(3)]);
        assert_eq!(sender.sent(), 1);
    }
}
