//! Alive indicator.
//!
//! Lowest-priority task: two LEDs blink in antiphase and a log line goes
//! out every [`HEARTBEAT_PERIOD_MS`]. If the blinking stops, a
//! higher-priority task is hogging the CPU.

use embassy_time::{Duration, Ticker};
use embedded_hal::digital::StatefulOutputPin;

use crate::config::HEARTBEAT_PERIOD_MS;

pub struct Heartbeat<P> {
    led1: P,
    led2: P,
    beats: u32,
}

impl<P: StatefulOutputPin> Heartbeat<P> {
    /// Log the boot line and put the LEDs in antiphase.
    pub fn start(mut led1: P, mut led2: P) -> Self {
        info!("tiltmouse up");
        // LED errors are cosmetic; the heartbeat keeps going without them.
        let _ = led1.set_high();
        let _ = led2.set_low();
        Self { led1, led2, beats: 0 }
    }

    pub fn beat(&mut self) {
        let _ = self.led1.toggle();
        let _ = self.led2.toggle();
        self.beats = self.beats.wrapping_add(1);
        info!("Heartbeat {}", self.beats);
    }

    pub fn beats(&self) -> u32 {
        self.beats
    }

    pub async fn run(mut self) -> ! {
        let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_PERIOD_MS));
        loop {
            ticker.next().await;
            self.beat();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};

    struct Led(bool);

    impl ErrorType for Led {
        type Error = Infallible;
    }

    impl OutputPin for Led {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0 = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0 = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for Led {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }
        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[test]
    fn leds_start_and_stay_in_antiphase() {
        let mut hb = Heartbeat::start(Led(false), Led(true));
        assert!(hb.led1.0);
        assert!(!hb.led2.0);

        for n in 1..=4u32 {
            hb.beat();
            assert_ne!(hb.led1.0, hb.led2.0);
            assert_eq!(hb.led1.0, n % 2 == 0);
            assert_eq!(hb.beats(), n);
        }
    }
}
