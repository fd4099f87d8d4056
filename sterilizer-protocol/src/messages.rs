//! Notifications sent from the prop to the game host

use crate::topics::HOST_TOPIC;

const SOLVED_TEXT: &str = "Sterilizer puzzle has been solved!";
const RESET_TEXT: &str = "Sterilizer has been reset!";

/// Status notification published on [`HOST_TOPIC`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Solve sequence finished, lock released
    Solved,
    /// Reset sequence finished, prop armed again
    Reset,
}

impl HostMessage {
    /// Topic this message is published on
    pub const fn topic(self) -> &'static str {
        HOST_TOPIC
    }

    /// Text payload as the game host expects it
    pub const fn as_str(self) -> &'static str {
        match self {
            HostMessage::Solved => SOLVED_TEXT,
            HostMessage::Reset => RESET_TEXT,
        }
    }

    /// Payload bytes
    pub const fn payload(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}
