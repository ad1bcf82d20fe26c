//! tiltmouse firmware - nRF52840 touch strip + accelerometer USB mouse.
//!
//! Executor layout, highest priority first:
//!
//! | Executor         | Tasks                    |
//! |------------------|--------------------------|
//! | EGU1_SWI1 (P5)   | HID sender               |
//! | EGU0_SWI0 (P6)   | aggregator               |
//! | EGU2_SWI2 (P7)   | touch, accel             |
//! | thread mode      | USB device, heartbeat    |
//!
//! The USB runner only reacts to bus events; it sits with the heartbeat
//! so that neither can delay a sample.

#![no_std]
#![no_main]

mod drivers;
mod usb;

use cortex_m_rt::entry;
use defmt::{info, warn};
use embassy_executor::{Executor, InterruptExecutor, SpawnError};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::saadc::{self, ChannelConfig, Saadc};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::UsbDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tiltmouse::accel::AccelSampler;
use tiltmouse::buttons::SwitchPair;
use tiltmouse::config;
use tiltmouse::error::{fatal, Error, Resource};
use tiltmouse::heartbeat::Heartbeat;
use tiltmouse::sender::HidSender;
use tiltmouse::sensor::CalibratedTouch;
use tiltmouse::touch::TouchScrollSampler;
use tiltmouse::{Aggregator, MouseReport};

use crate::drivers::mma8451::Mma8451;
use crate::drivers::touch_adc::AdcTouch;
use crate::usb::hid_device::{UsbDriver, UsbMouse};

bind_interrupts!(pub(crate) struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
    SAADC => saadc::InterruptHandler;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type Channels = tiltmouse::Channels<CriticalSectionRawMutex>;
type Switches = SwitchPair<Input<'static>, Input<'static>>;

static CHANNELS: StaticCell<Channels> = StaticCell::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_SAMPLE: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
unsafe fn EGU0_SWI0() {
    EXECUTOR_MED.on_interrupt()
}

#[interrupt]
unsafe fn EGU2_SWI2() {
    EXECUTOR_SAMPLE.on_interrupt()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[embassy_executor::task]
async fn hid_sender_task(
    mouse: UsbMouse,
    reports: &'static Signal<CriticalSectionRawMutex, MouseReport>,
) -> ! {
    HidSender::new(mouse).run(reports).await
}

#[embassy_executor::task]
async fn aggregator_task(buttons: Switches, channels: &'static Channels) -> ! {
    Aggregator::new(buttons).run(channels.aggregator_port()).await
}

#[embassy_executor::task]
async fn touch_task(adc: Saadc<'static, 1>, channels: &'static Channels) -> ! {
    let sensor = CalibratedTouch::calibrate(AdcTouch::new(adc).await).await;
    TouchScrollSampler::new().run(sensor, channels.touch_port()).await
}

#[embassy_executor::task]
async fn accel_task(
    mut sensor: Mma8451<Twim<'static, peripherals::TWISPI0>>,
    channels: &'static Channels,
) -> ! {
    // Keep sampling anyway: read errors hold the last value and the
    // aggregator still gets its report every cycle.
    if let Err(e) = sensor.init().await {
        warn!("Accelerometer init failed: {}", e);
    }
    AccelSampler::new().run(sensor, channels.accel_port()).await
}

#[embassy_executor::task]
async fn usb_device_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    usb::hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn heartbeat_task(led1: Output<'static>, led2: Output<'static>) -> ! {
    Heartbeat::start(led1, led2).run().await
}

/// A task that cannot be spawned leaves the pipeline incomplete.
fn spawned(result: Result<(), SpawnError>) {
    if result.is_err() {
        fatal(Error::ResourceExhausted(Resource::TaskPool));
    }
}

#[entry]
fn main() -> ! {
    info!("tiltmouse starting");

    let p = embassy_nrf::init(Default::default());

    let channels: &'static Channels = match CHANNELS.try_init(Channels::new()) {
        Some(c) => c,
        None => fatal(Resource::StaticCell.into()),
    };

    let usb = match usb::hid_device::init(p.USBD) {
        Ok(usb) => usb,
        Err(e) => fatal(e),
    };

    let buttons = SwitchPair::new(Input::new(p.P0_11, Pull::Up), Input::new(p.P0_12, Pull::Up));

    let adc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [ChannelConfig::single_ended(p.P0_02)],
    );

    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let accel = Mma8451::new(i2c, config::ACCEL_I2C_ADDRESS);

    let led1 = Output::new(p.P0_13, Level::Low, OutputDrive::Standard);
    let led2 = Output::new(p.P0_14, Level::Low, OutputDrive::Standard);

    interrupt::EGU1_SWI1.set_priority(Priority::P5);
    let spawner = EXECUTOR_HIGH.start(interrupt::EGU1_SWI1);
    spawned(spawner.spawn(hid_sender_task(usb.mouse, channels.mouse())));

    interrupt::EGU0_SWI0.set_priority(Priority::P6);
    let spawner = EXECUTOR_MED.start(interrupt::EGU0_SWI0);
    spawned(spawner.spawn(aggregator_task(buttons, channels)));

    interrupt::EGU2_SWI2.set_priority(Priority::P7);
    let spawner = EXECUTOR_SAMPLE.start(interrupt::EGU2_SWI2);
    spawned(spawner.spawn(touch_task(adc, channels)));
    spawned(spawner.spawn(accel_task(accel, channels)));

    let executor = match EXECUTOR_LOW.try_init(Executor::new()) {
        Some(e) => e,
        None => fatal(Resource::StaticCell.into()),
    };
    executor.run(|spawner| {
        spawned(spawner.spawn(usb_device_task(usb.device)));
        spawned(spawner.spawn(heartbeat_task(led1, led2)));
    })
}
