//! Unified error type for tiltmouse.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Collaborators return [`SensorError`] / [`TransportError`]; only startup
//! resource failures become an [`Error`] and reach [`fatal`].

/// Errors that stop the firmware. Sensor and transport errors never get
/// here; the task that sees them absorbs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A startup resource could not be acquired.
    ResourceExhausted(Resource),
}

/// Startup resources whose absence stops the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    /// No free slot in an executor task pool.
    TaskPool,
    /// A static cell was initialised twice.
    StaticCell,
}

/// Errors from the sensor collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NAK, arbitration loss, timeout).
    Bus,
    /// The device did not identify itself as expected.
    NotPresent,
}

/// Errors from the HID transport. All of them are transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Host has not configured the device yet (or it is suspended).
    NotReady,
    /// The endpoint is disabled.
    Disabled,
    /// The report did not fit the endpoint buffer.
    Overflow,
}

// Convenience conversions

impl From<Resource> for Error {
    fn from(r: Resource) -> Self {
        Error::ResourceExhausted(r)
    }
}

/// Stop on an unrecoverable error.
///
/// On target this lands in `panic-probe`, which prints the message over
/// RTT and halts the core.
pub fn fatal(err: Error) -> ! {
    error!("fatal: {:?}", err);
    panic!("unrecoverable error: {:?}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_converts_into_top_level() {
        assert_eq!(
            Error::from(Resource::TaskPool),
            Error::ResourceExhausted(Resource::TaskPool)
        );
    }

    #[test]
    #[should_panic(expected = "unrecoverable error")]
    fn fatal_panics_instead_of_spinning() {
        fatal(Error::ResourceExhausted(Resource::StaticCell));
    }
}
