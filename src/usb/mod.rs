//! USB Device subsystem - presents a boot-protocol HID mouse to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  The device has a single HID interface carrying the
//! 4-byte mouse report.
//!
//! The HID sender task owns the endpoint writer and pushes one report per
//! aggregation cycle.

pub mod hid_device;
