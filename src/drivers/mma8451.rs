//! MMA8451Q 3-axis accelerometer over I2C.
//!
//! Only X and Y are read. Output registers are 14-bit left-justified, so
//! the big-endian pair is already a full-scale `i16`.

use defmt::info;
use embedded_hal_async::i2c::I2c;
use tiltmouse::error::SensorError;
use tiltmouse::sensor::Accelerometer;

const REG_OUT_X_MSB: u8 = 0x01;
const REG_WHO_AM_I: u8 = 0x0D;
const REG_XYZ_DATA_CFG: u8 = 0x0E;
const REG_CTRL_REG1: u8 = 0x2A;

const DEVICE_ID: u8 = 0x1A;

/// XYZ_DATA_CFG: +-4 g full scale.
const RANGE_4G: u8 = 0x01;
/// CTRL_REG1: ACTIVE, 800 Hz output data rate.
const MODE_ACTIVE: u8 = 0x01;
const MODE_STANDBY: u8 = 0x00;

pub struct Mma8451<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mma8451<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check the device ID and switch to active mode.
    ///
    /// Range can only be changed in standby.
    pub async fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(self.address, &[REG_WHO_AM_I], &mut id)
            .await
            .map_err(|_| SensorError::Bus)?;
        if id[0] != DEVICE_ID {
            return Err(SensorError::NotPresent);
        }

        self.write_reg(REG_CTRL_REG1, MODE_STANDBY).await?;
        self.write_reg(REG_XYZ_DATA_CFG, RANGE_4G).await?;
        self.write_reg(REG_CTRL_REG1, MODE_ACTIVE).await?;
        info!("MMA8451 at {=u8:#x} active", self.address);
        Ok(())
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> Accelerometer for Mma8451<I2C> {
    async fn read_raw(&mut self) -> Result<(i16, i16), SensorError> {
        let mut buf = [0u8; 4];
        self.i2c
            .write_read(self.address, &[REG_OUT_X_MSB], &mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;
        Ok((
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
        ))
    }
}
