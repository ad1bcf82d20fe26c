//! USB HID mouse device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one HID IN endpoint.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::info;
use embassy_nrf::peripherals;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;
use tiltmouse::config;
use tiltmouse::error::{Error, Resource, TransportError};
use tiltmouse::hid::{MouseReport, MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
use tiltmouse::sensor::HidTransport;

use crate::Irqs;

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

static USB_CONFIGURED: AtomicBool = AtomicBool::new(false);
static USB_SUSPENDED: AtomicBool = AtomicBool::new(false);

struct UsbStateHandler;

impl embassy_usb::Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        USB_CONFIGURED.store(configured, Ordering::Relaxed);
        info!("USB configured={}", configured);
    }

    fn suspended(&mut self, suspended: bool) {
        USB_SUSPENDED.store(suspended, Ordering::Relaxed);
        info!("USB suspended={}", suspended);
    }
}

/// Host has configured the device and the bus is awake.
fn link_ready() -> bool {
    USB_CONFIGURED.load(Ordering::Relaxed) && !USB_SUSPENDED.load(Ordering::Relaxed)
}

fn claim<T>(cell: &'static StaticCell<T>, value: T) -> Result<&'static mut T, Error> {
    cell.try_init(value).ok_or(Error::ResourceExhausted(Resource::StaticCell))
}

/// Mouse endpoint wrapped as the pipeline's transport.
pub struct UsbMouse {
    writer: HidWriter<'static, UsbDriver, 8>,
}

impl HidTransport for UsbMouse {
    async fn send(&mut self, report: &MouseReport) -> Result<(), TransportError> {
        // Don't park the sender on an endpoint nobody polls.
        if !link_ready() {
            return Err(TransportError::NotReady);
        }

        let mut buf = [0u8; MOUSE_REPORT_SIZE];
        let n = report.serialize(&mut buf);
        self.writer.write(&buf[..n]).await.map_err(|e| match e {
            EndpointError::BufferOverflow => TransportError::Overflow,
            _ => TransportError::Disabled,
        })
    }
}

/// Build result containing the USB device runner and the mouse transport.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub mouse: UsbMouse,
}

/// Initialise the USB stack and create the HID mouse.
///
/// Must be called exactly once; a second call fails with
/// `ResourceExhausted(StaticCell)`.
pub fn init(usbd: peripherals::USBD) -> Result<UsbHidDevice, Error> {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        claim(&USB_CONFIG_DESC, [0u8; 256])?,
        claim(&USB_BOS_DESC, [0u8; 256])?,
        claim(&USB_MSOS_DESC, [0u8; 256])?,
        claim(&USB_CTRL_BUF, [0u8; 64])?,
    );

    builder.handler(claim(&USB_STATE_HANDLER, UsbStateHandler)?);

    let mouse_config = HidConfig {
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let writer = HidWriter::new(&mut builder, claim(&MOUSE_STATE, State::new())?, mouse_config);

    let device = builder.build();

    info!("USB HID mouse initialised");

    Ok(UsbHidDevice {
        device,
        mouse: UsbMouse { writer },
    })
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}
