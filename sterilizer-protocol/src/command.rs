//! Commands received from the game host

use core::ops::Deref;

use heapless::Vec;

use crate::topics::MAX_PAYLOAD_SIZE;

/// Raw inbound payload as buffered on the device
///
/// At most [`MAX_PAYLOAD_SIZE`] bytes are kept. A payload that did not fit
/// remembers it was cut short and never decodes to a command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payload {
    bytes: Vec<u8, MAX_PAYLOAD_SIZE>,
    truncated: bool,
}

impl Payload {
    /// Buffer a payload as received, truncating it if needed
    pub fn from_wire(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_PAYLOAD_SIZE);
        let mut buffered = Vec::new();
        // Cannot fail: len is bounded by the capacity
        let _ = buffered.extend_from_slice(&bytes[..len]);
        Self {
            bytes: buffered,
            truncated: len < bytes.len(),
        }
    }

    /// Check if bytes were dropped when buffering
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

// Wire tokens
const TOKEN_SOLVE: &[u8] = b"solve";
const TOKEN_RESET: &[u8] = b"reset";

/// Command decoded from a `ToDevice/Sterilizer` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundCommand {
    /// Run the solve sequence
    Solve,
    /// Run the reset sequence
    Reset,
    /// Anything else; kept for diagnostics only
    Unrecognized,
}

impl InboundCommand {
    /// Decode a payload
    ///
    /// Matching is ASCII case-insensitive and ignores surrounding
    /// whitespace. Empty, unknown and non-ASCII payloads all decode to
    /// [`InboundCommand::Unrecognized`].
    pub fn decode(payload: &[u8]) -> Self {
        let token = payload.trim_ascii();

        if token.eq_ignore_ascii_case(TOKEN_SOLVE) {
            InboundCommand::Solve
        } else if token.eq_ignore_ascii_case(TOKEN_RESET) {
            InboundCommand::Reset
        } else {
            InboundCommand::Unrecognized
        }
    }

    /// Decode a buffered payload
    ///
    /// A truncated payload is [`InboundCommand::Unrecognized`] whatever
    /// its first bytes say.
    pub fn from_payload(payload: &Payload) -> Self {
        if payload.is_truncated() {
            InboundCommand::Unrecognized
        } else {
            Self::decode(payload.as_bytes())
        }
    }

    /// Wire token for recognized commands
    pub fn token(self) -> Option<&'static str> {
        match self {
            InboundCommand::Solve => Some("solve"),
            InboundCommand::Reset => Some("reset"),
            InboundCommand::Unrecognized => None,
        }
    }

    /// Returns true for commands the prop acts on
    pub fn is_recognized(self) -> bool {
        !matches!(self, InboundCommand::Unrecognized)
    }
}
