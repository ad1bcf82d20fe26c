//! Collaborator interfaces between the fusion core and the hardware.
//!
//! Board code implements these for the real peripherals; tests implement
//! them with scripted fakes.

use crate::error::{SensorError, TransportError};
use crate::hid::{Buttons, MouseReport};

/// Capacitive touch strip front-end.
#[allow(async_fn_in_trait)]
pub trait TouchSensor {
    /// Instantaneous, uncalibrated measurement.
    async fn read_raw(&mut self) -> u16;
}

/// Two-axis inertial sensor.
#[allow(async_fn_in_trait)]
pub trait Accelerometer {
    /// Instantaneous X/Y reading. May wait on a bus transaction.
    async fn read_raw(&mut self) -> Result<(i16, i16), SensorError>;
}

/// Digital button inputs.
pub trait ButtonReader {
    /// Current state. Never blocks.
    fn read(&mut self) -> Buttons;
}

/// Best-effort link to the host.
#[allow(async_fn_in_trait)]
pub trait HidTransport {
    async fn send(&mut self, report: &MouseReport) -> Result<(), TransportError>;
}

/// Touch sensor with the no-contact level subtracted.
///
/// The first reading after power-up is taken as the baseline, so nobody
/// may be touching the strip while [`CalibratedTouch::calibrate`] runs.
pub struct CalibratedTouch<T> {
    inner: T,
    baseline: u16,
}

impl<T: TouchSensor> CalibratedTouch<T> {
    pub async fn calibrate(mut inner: T) -> Self {
        let baseline = inner.read_raw().await;
        info!("Touch baseline: {}", baseline);
        Self { inner, baseline }
    }

    pub fn baseline(&self) -> u16 {
        self.baseline
    }
}

impl<T: TouchSensor> TouchSensor for CalibratedTouch<T> {
    /// Counts above the baseline, 0 when below it.
    async fn read_raw(&mut self) -> u16 {
        self.inner.read_raw().await.saturating_sub(self.baseline)
    }
}
