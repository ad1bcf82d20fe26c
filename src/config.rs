//! Application-wide constants and compile-time configuration.
//!
//! All sensor thresholds, timing parameters, and USB identity constants
//! live here so they can be tuned in one place.

// Touch strip

/// Touch strip sampling period (ms).
pub const TOUCH_SAMPLE_PERIOD_MS: u64 = 2;

/// Calibrated readings at or below this are "no contact".
pub const TOUCH_LOW_THRESHOLD: u16 = 150;

/// Calibrated readings at or above this are sensor noise.
pub const TOUCH_HIGH_THRESHOLD: u16 = 1500;

/// Largest per-sample change of the filtered value that still counts as
/// finger motion. Landing on or lifting off the strip steps the filter
/// input to/from zero and produces bigger jumps.
pub const TOUCH_MAX_PLAUSIBLE_JUMP: i32 = 50;

/// Consecutive in-band samples before motion is trusted (debounce count).
pub const TOUCH_MIN_CONSECUTIVE: u8 = 100;

/// A full swipe accumulates roughly 100..1000 counts; dividing by 16 maps
/// that onto the wheel's +-127 range.
pub const TOUCH_SCROLL_DIVISOR: i32 = 16;

// Filter

/// Moving-average window length (samples).
pub const FILTER_WINDOW: usize = 32;

// Accelerometer

/// Accelerometer sampling period (ms).
pub const ACCEL_SAMPLE_PERIOD_MS: u64 = 2;

/// Raw axes are arithmetically shifted right by this many bits.
pub const ACCEL_SCALE_SHIFT: u32 = 8;

// Aggregation

/// Fused report period (ms).
pub const REPORT_PERIOD_MS: u64 = 10;

/// Depth of the sampler -> aggregator queue. One slot per producer.
pub const PERIPHERAL_QUEUE_DEPTH: usize = 2;

/// Symmetric range of every relative HID axis (x, y, wheel).
pub const HID_AXIS_MIN: i8 = -127;
pub const HID_AXIS_MAX: i8 = 127;

// Heartbeat

/// Heartbeat LED toggle / log period (ms).
pub const HEARTBEAT_PERIOD_MS: u64 = 1000;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "tiltmouse";
pub const USB_PRODUCT: &str = "Touch + Tilt USB Mouse";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` are
// picked in `main.rs`.  Adjust for your custom PCB.
//
//   Switch 1 (LEFT)   -> P0.11
//   Switch 2 (RIGHT)  -> P0.12
//   Touch front-end   -> P0.02 / AIN0
//   I2C SDA           -> P0.26
//   I2C SCL           -> P0.27
//   LED1              -> P0.13
//   LED2              -> P0.14

/// 7-bit I2C address of the accelerometer (MMA8451Q, SA0 high).
pub const ACCEL_I2C_ADDRESS: u8 = 0x1D;
