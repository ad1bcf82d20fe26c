//! Physical mouse buttons.
//!
//! Two tactile switches, active-low with internal pull-ups:
//!   - SW1 - left button
//!   - SW2 - right button
//!
//! Sampled once per report cycle by the aggregator, so no edge tracking or
//! debouncing is done here: a bounce only lasts a cycle or two.

use crate::hid::Buttons;
use crate::sensor::ButtonReader;
use embedded_hal::digital::InputPin;

/// Left/right switch pair.
pub struct SwitchPair<L, R> {
    left: L,
    right: R,
}

impl<L: InputPin, R: InputPin> SwitchPair<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

/// A pin that cannot be read counts as released.
fn pressed<P: InputPin>(pin: &mut P) -> bool {
    pin.is_low().unwrap_or(false)
}

impl<L: InputPin, R: InputPin> ButtonReader for SwitchPair<L, R> {
    fn read(&mut self) -> Buttons {
        let left = pressed(&mut self.left);
        let right = pressed(&mut self.right);
        Buttons::from_pressed(left, false, right, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct Level(bool);

    impl ErrorType for Level {
        type Error = Infallible;
    }

    impl InputPin for Level {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl embedded_hal::digital::Error for Broken {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    impl ErrorType for Broken {
        type Error = Broken;
    }

    impl InputPin for Broken {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(Broken)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(Broken)
        }
    }

    #[test]
    fn released_switches_read_high() {
        let mut pair = SwitchPair::new(Level(true), Level(true));
        assert_eq!(pair.read(), Buttons::NONE);
    }

    #[test]
    fn active_low_maps_to_left_and_right() {
        assert_eq!(SwitchPair::new(Level(false), Level(true)).read(), Buttons::LEFT);
        assert_eq!(SwitchPair::new(Level(true), Level(false)).read(), Buttons::RIGHT);
        assert_eq!(
            SwitchPair::new(Level(false), Level(false)).read(),
            Buttons::LEFT | Buttons::RIGHT
        );
    }

    #[test]
    fn unreadable_pin_is_released() {
        let mut pair = SwitchPair::new(Broken, Level(false));
        assert_eq!(pair.read(), Buttons::RIGHT);
    }
}
