//! # Digital Output
//!
//! A stateful binary output over an `embedded-hal` pin, with configurable
//! polarity for active-low wiring. The connection manager drives one of these
//! as its "still trying to connect" indicator, but the type is general enough
//! for relays, LEDs, or any other on/off peripheral.

use embedded_hal::digital::{OutputPin, PinState};

/// A binary output signal with a logical on/off state.
///
/// The logical state is tracked in the wrapper; the electrical level written
/// to the pin is derived from the configured active level, so an active-low
/// indicator reads `is_on() == true` while the pin is driven low.
pub struct DigitalOutput<P: OutputPin> {
    pin: P,
    on_level: PinState,
    state: bool,
}

impl<P: OutputPin> DigitalOutput<P> {
    /// Create an active-high output: on drives the pin high.
    pub fn new(pin: P) -> Self {
        Self::with_levels(pin, PinState::High)
    }

    /// Create an output with an explicit active level. Pass
    /// [`PinState::Low`] for active-low wiring.
    pub fn with_levels(pin: P, on_level: PinState) -> Self {
        Self {
            pin,
            on_level,
            state: false,
        }
    }

    /// Apply the initial (off) state to the pin. Call once before use.
    pub fn begin(&mut self) -> Result<(), P::Error> {
        self.set_state(false)
    }

    /// Switch the output on.
    pub fn on(&mut self) -> Result<(), P::Error> {
        self.set_state(true)
    }

    /// Switch the output off.
    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set_state(false)
    }

    /// Invert the current logical state.
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.set_state(!self.state)
    }

    /// Set the logical state directly.
    pub fn set_state(&mut self, on: bool) -> Result<(), P::Error> {
        self.state = on;
        self.pin
            .set_state(if on { self.on_level } else { !self.on_level })
    }

    /// Whether the output is logically on.
    pub fn is_on(&self) -> bool {
        self.state
    }

    /// Whether the output is logically off.
    pub fn is_off(&self) -> bool {
        !self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockPin;

    #[test]
    fn begin_applies_off_level() {
        let mut output = DigitalOutput::new(MockPin::default());
        output.begin().unwrap();
        assert!(output.is_off());
        assert_eq!(output.pin.level, Some(PinState::Low));
    }

    #[test]
    fn on_off_drive_active_high_levels() {
        let mut output = DigitalOutput::new(MockPin::default());
        output.on().unwrap();
        assert!(output.is_on());
        assert_eq!(output.pin.level, Some(PinState::High));

        output.off().unwrap();
        assert!(output.is_off());
        assert_eq!(output.pin.level, Some(PinState::Low));
    }

    #[test]
    fn active_low_wiring_inverts_levels() {
        let mut output = DigitalOutput::with_levels(MockPin::default(), PinState::Low);
        output.begin().unwrap();
        assert_eq!(output.pin.level, Some(PinState::High));

        output.on().unwrap();
        assert!(output.is_on());
        assert_eq!(output.pin.level, Some(PinState::Low));
    }

    #[test]
    fn toggle_inverts_logical_state() {
        let mut output = DigitalOutput::new(MockPin::default());
        output.begin().unwrap();

        output.toggle().unwrap();
        assert!(output.is_on());

        output.toggle().unwrap();
        assert!(output.is_off());
    }

    #[test]
    fn set_state_matches_on_off() {
        let mut output = DigitalOutput::new(MockPin::default());
        output.set_state(true).unwrap();
        assert!(output.is_on());
        output.set_state(false).unwrap();
        assert!(output.is_off());
    }
}
