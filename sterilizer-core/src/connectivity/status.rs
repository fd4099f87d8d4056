//! Connection status and fault taxonomy

/// Status of one external channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionStatus {
    /// Down, reconnection still within budget
    #[default]
    Disconnected,
    /// Up
    Connected,
    /// Down and the reconnect budget is exhausted; needs an operator
    TimedOut,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == ConnectionStatus::Connected
    }

    pub fn is_timed_out(self) -> bool {
        self == ConnectionStatus::TimedOut
    }
}

/// Device fault conditions
///
/// None of these stop the puzzle. Unavailable faults are handled by the
/// monitors' retry policy, timed-out faults are shown on the status
/// indicator, unrecognized commands are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Wireless link down, retrying
    LinkUnavailable,
    /// Broker session down, retrying (or waiting for the link)
    BrokerUnavailable,
    /// Wireless link retry budget exhausted
    LinkTimedOut,
    /// Broker retry budget exhausted
    BrokerTimedOut,
    /// Payload on the command topic did not match any command
    UnrecognizedCommand,
}

impl Fault {
    /// Fault for the link channel in `status`, if any
    pub fn for_link(status: ConnectionStatus) -> Option<Self> {
        match status {
            ConnectionStatus::Connected => None,
            ConnectionStatus::Disconnected => Some(Fault::LinkUnavailable),
            ConnectionStatus::TimedOut => Some(Fault::LinkTimedOut),
        }
    }

    /// Fault for the broker channel in `status`, if any
    pub fn for_broker(status: ConnectionStatus) -> Option<Self> {
        match status {
            ConnectionStatus::Connected => None,
            ConnectionStatus::Disconnected => Some(Fault::BrokerUnavailable),
            ConnectionStatus::TimedOut => Some(Fault::BrokerTimedOut),
        }
    }

    /// Returns true if the fault clears without intervention
    pub fn is_recoverable(self) -> bool {
        matches!(self, Fault::LinkUnavailable | Fault::BrokerUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_mapping() {
        assert_eq!(Fault::for_link(ConnectionStatus::Connected), None);
        assert_eq!(
            Fault::for_link(ConnectionStatus::Disconnected),
            Some(Fault::LinkUnavailable)
        );
        assert_eq!(
            Fault::for_broker(ConnectionStatus::TimedOut),
            Some(Fault::BrokerTimedOut)
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(Fault::LinkUnavailable.is_recoverable());
        assert!(Fault::BrokerUnavailable.is_recoverable());
        assert!(!Fault::LinkTimedOut.is_recoverable());
        assert!(!Fault::UnrecognizedCommand.is_recoverable());
    }
}
