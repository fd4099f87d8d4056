//! GPIO relay output
//!
//! Drives a relay module (or SSR/MOSFET) from a GPIO pin.

use embedded_hal::digital::OutputPin;
use sterilizer_core::traits::Relay;

/// GPIO relay output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioRelay<P> {
    pin: P,
    /// If true, relay ON = pin LOW
    inverted: bool,
    /// Current logical state (true = relay energized)
    on: bool,
    /// A pin write failed at some point
    fault: bool,
}

impl<P: OutputPin> GpioRelay<P> {
    /// Create a new relay output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the relay is ON when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            on: false,
            fault: false,
        };
        // Ensure relay starts off
        relay.set_on(false);
        relay
    }

    /// Create a new relay with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new relay with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Check if a pin write ever failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }
}

impl<P: OutputPin> Relay for GpioRelay<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;

        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            self.fault = true;
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
