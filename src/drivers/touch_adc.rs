//! Touch strip front-end read through the SAADC.
//!
//! The strip's analog output sits on AIN0; one single-ended conversion per
//! `read_raw`.

use embassy_nrf::saadc::Saadc;
use tiltmouse::sensor::TouchSensor;

pub struct AdcTouch {
    adc: Saadc<'static, 1>,
}

impl AdcTouch {
    /// Run the SAADC offset calibration and take ownership of the channel.
    pub async fn new(adc: Saadc<'static, 1>) -> Self {
        adc.calibrate().await;
        Self { adc }
    }
}

impl TouchSensor for AdcTouch {
    async fn read_raw(&mut self) -> u16 {
        let mut buf = [0i16; 1];
        self.adc.sample(&mut buf).await;
        // Single-ended conversions can dip just below zero near ground.
        buf[0].max(0) as u16
    }
}
