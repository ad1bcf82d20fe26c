//! Board peripherals behind the fusion core's sensor traits.

pub mod mma8451;
pub mod touch_adc;
