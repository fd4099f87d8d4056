//! Connection status indicator
//!
//! Maps the link and broker statuses to a solid strip color. Only changes
//! are emitted, so the strip is not rewritten every tick.

use crate::animation::Color;
use crate::connectivity::ConnectionStatus;

/// Visual connectivity signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Wireless link down (purple)
    NoNetwork,
    /// Link up, broker session down (blue)
    BrokerDown,
    /// Both up (red)
    Online,
}

impl Signal {
    /// Signal for a link/broker status pair
    pub fn from_status(link: ConnectionStatus, broker: ConnectionStatus) -> Self {
        if !link.is_connected() {
            Signal::NoNetwork
        } else if !broker.is_connected() {
            Signal::BrokerDown
        } else {
            Signal::Online
        }
    }

    pub fn color(self) -> Color {
        match self {
            Signal::NoNetwork => Color::PURPLE,
            Signal::BrokerDown => Color::BLUE,
            Signal::Online => Color::RED,
        }
    }
}

/// Change detector for [`Signal`]
#[derive(Debug, Default)]
pub struct StatusIndicator {
    last: Option<Signal>,
}

impl StatusIndicator {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Compute the signal, returning it only if it differs from the last one
    pub fn update(&mut self, link: ConnectionStatus, broker: ConnectionStatus) -> Option<Signal> {
        let signal = Signal::from_status(link, broker);
        if self.last == Some(signal) {
            return None;
        }
        self.last = Some(signal);
        Some(signal)
    }

    /// Forget the last emission; the next update emits unconditionally
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn last_emitted(&self) -> Option<Signal> {
        self.last
    }
}
