//! HID report types sent to the host.

pub mod mouse;


pub use mouse::{Buttons, MouseReport, MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
