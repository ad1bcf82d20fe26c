//! Touch-strip + accelerometer USB mouse: sensor fusion core.
//!
//! Everything that can be tested on the host (no embedded hardware
//! required) lives in this library; the embedded binary in `main.rs` only
//! binds it to nRF52840 peripherals and executors.
//!
//! Usage: `cargo test`
//!
//! ```text
//!  touch strip -> TouchScrollSampler --\
//!                                       >-- Aggregator -- MouseReport --> HidSender -> USB
//!  accelerometer -> AccelSampler ------/        ^
//!                                      buttons -/
//! ```

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod accel;
pub mod aggregator;
pub mod buttons;
pub mod channels;
pub mod config;
pub mod error;
pub mod filter;
pub mod heartbeat;
pub mod hid;
pub mod report;
pub mod sender;
pub mod sensor;
pub mod touch;

pub use aggregator::Aggregator;
pub use channels::Channels;
pub use error::{Error, SensorError, TransportError};
pub use hid::{Buttons, MouseReport};
pub use report::{PeripheralReport, ReportSource};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - whole-cycle behaviour across modules
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::accel::AccelSampler;
    use super::aggregator::Aggregator;
    use super::channels::{Channels, SamplerPort};
    use super::hid::{Buttons, MouseReport};
    use super::sensor::ButtonReader;
    use super::touch::TouchScrollSampler;
    use embassy_futures::block_on;
    use embassy_futures::join::join3;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    // Init logger for tests
    #[ctor::ctor]
    fn init_log() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    struct Fixed(Buttons);

    impl ButtonReader for Fixed {
        fn read(&mut self) -> Buttons {
            self.0
        }
    }

    async fn answer_touch(s: &mut TouchScrollSampler, port: &SamplerPort<'_, NoopRawMutex>) {
        port.requested().await;
        port.deliver(s.take_report()).await;
    }

    async fn answer_accel(s: &AccelSampler, port: &SamplerPort<'_, NoopRawMutex>) {
        port.requested().await;
        port.deliver(s.take_report()).await;
    }

    #[test]
    fn samplers_answer_a_cycle_concurrently() {
        let channels = Channels::<NoopRawMutex>::new();
        let touch_port = channels.touch_port();
        let accel_port = channels.accel_port();
        let agg_port = channels.aggregator_port();

        let mut touch = TouchScrollSampler::new();
        let mut accel = AccelSampler::new();
        let mut agg = Aggregator::new(Fixed(Buttons::LEFT));

        for i in 0..140u16 {
            touch.sample(200 + i * 9);
        }
        accel.sample(Ok((40 << 8, -(3 << 8))));

        // Samplers are polled before the aggregator raises the requests.
        let (_, _, out) = block_on(join3(
            answer_touch(&mut touch, &touch_port),
            answer_accel(&accel, &accel_port),
            agg.cycle(&agg_port),
        ));

        assert!(out.scroll > 0);
        assert_eq!((out.x, out.y), (40, -3));
        assert_eq!(out.buttons, Buttons::LEFT);
        assert_eq!(touch.accumulated_distance(), 0);
        assert_eq!(channels.mouse().try_take(), Some(out));
    }

    #[test]
    fn consecutive_cycles_publish_only_newest() {
        let channels = Channels::<NoopRawMutex>::new();
        let touch_port = channels.touch_port();
        let accel_port = channels.accel_port();
        let agg_port = channels.aggregator_port();

        let mut touch = TouchScrollSampler::new();
        let mut accel = AccelSampler::new();
        let mut agg = Aggregator::new(Fixed(Buttons::NONE));

        // Nobody consumes the output between cycles.
        for x in [1i16, 2, 3] {
            accel.sample(Ok((x << 8, 0)));
            block_on(join3(
                answer_touch(&mut touch, &touch_port),
                answer_accel(&accel, &accel_port),
                agg.cycle(&agg_port),
            ));
        }

        let out = channels.mouse();
        assert_eq!(
            out.try_take(),
            Some(MouseReport {
                x: 3,
                ..MouseReport::empty()
            })
        );
        assert!(out.try_take().is_none());
        assert_eq!(agg.cycles(), 3);
    }
}
