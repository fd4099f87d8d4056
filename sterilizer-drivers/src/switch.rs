//! Trigger switch input
//!
//! The switch pulls the pin to ground when closed; the pin needs a
//! pull-up.

use embedded_hal::digital::InputPin;
use sterilizer_core::traits::TriggerSensor;

/// Active-low trigger switch
pub struct TriggerSwitch<P> {
    pin: P,
    fault: bool,
}

impl<P: InputPin> TriggerSwitch<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, fault: false }
    }

    /// Check if a pin read ever failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }
}

impl<P: InputPin> TriggerSensor for TriggerSwitch<P> {
    fn is_triggered(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => low,
            Err(_) => {
                // Unreadable switch counts as open
                self.fault = true;
                false
            }
        }
    }
}
