//! Command decoding and dispatch

use heapless::Vec;

use super::{InboundCommand, Inbox, Payload};
use crate::config::INBOX_DEPTH;
use crate::puzzle::{CommandOutcome, PuzzleMachine};
use crate::traits::{LedStrip, Relay};

/// What happened to one drained message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteOutcome {
    /// Decoded and handed to the puzzle machine
    Dispatched {
        command: InboundCommand,
        outcome: CommandOutcome,
    },
    /// Payload did not decode to a command
    Unrecognized(Payload),
}

/// Drains the inbox into the puzzle machine
#[derive(Debug, Default)]
pub struct CommandRouter {
    dispatched: u32,
    unrecognized: u32,
}

impl CommandRouter {
    pub const fn new() -> Self {
        Self {
            dispatched: 0,
            unrecognized: 0,
        }
    }

    /// Decode a raw payload
    pub fn decode(raw: &[u8]) -> InboundCommand {
        InboundCommand::decode(raw)
    }

    /// Dispatch queued messages in arrival order
    ///
    /// Stops as soon as the machine is running a sequence; whatever is
    /// left stays queued for a later tick.
    pub fn route<R: Relay, L: LedStrip>(
        &mut self,
        inbox: &mut Inbox,
        machine: &mut PuzzleMachine<R>,
        now_ms: u32,
        strip: &mut L,
    ) -> Vec<RouteOutcome, INBOX_DEPTH> {
        let mut outcomes = Vec::new();

        while !machine.is_busy() {
            let Some(payload) = inbox.pop() else {
                break;
            };

            let outcome = match InboundCommand::from_payload(&payload) {
                InboundCommand::Unrecognized => {
                    self.unrecognized = self.unrecognized.wrapping_add(1);
                    RouteOutcome::Unrecognized(payload)
                }
                command => {
                    self.dispatched = self.dispatched.wrapping_add(1);
                    RouteOutcome::Dispatched {
                        command,
                        outcome: machine.on_command(command, now_ms, strip),
                    }
                }
            };
            // At most INBOX_DEPTH messages can be drained per call
            let _ = outcomes.push(outcome);
        }

        outcomes
    }

    /// Commands handed to the machine so far
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    /// Payloads that did not decode so far
    pub fn unrecognized(&self) -> u32 {
        self.unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::mock::{MockRelay, MockStrip};
    use crate::puzzle::Relays;
    use crate::state::SequenceKind;

    fn machine() -> PuzzleMachine<MockRelay> {
        let relays = Relays::new(
            MockRelay::default(),
            MockRelay::default(),
            MockRelay::default(),
        );
        let mut machine = PuzzleMachine::new(relays, DeviceConfig::DEFAULT.timing);
        machine.advance_boot();
        machine
    }

    #[test]
    fn test_decode() {
        assert_eq!(CommandRouter::decode(b"SOLVE"), InboundCommand::Solve);
        assert_eq!(CommandRouter::decode(b"solve"), InboundCommand::Solve);
        assert_eq!(CommandRouter::decode(b"reset"), InboundCommand::Reset);
        assert_eq!(CommandRouter::decode(b""), InboundCommand::Unrecognized);
        assert_eq!(
            CommandRouter::decode(b"blink"),
            InboundCommand::Unrecognized
        );
    }

    #[test]
    fn test_unrecognized_reported() {
        let mut router = CommandRouter::new();
        let mut inbox = Inbox::new();
        let mut machine = machine();
        let mut strip = MockStrip::new();

        inbox.push(b"blink").unwrap();
        let outcomes = router.route(&mut inbox, &mut machine, 0, &mut strip);

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            &outcomes[0],
            RouteOutcome::Unrecognized(p) if &p[..] == b"blink"
        ));
        assert_eq!(router.unrecognized(), 1);
        assert!(!machine.is_busy());
    }

    #[test]
    fn test_stops_when_sequence_starts() {
        let mut router = CommandRouter::new();
        let mut inbox = Inbox::new();
        let mut machine = machine();
        let mut strip = MockStrip::new();

        inbox.push(b"blink").unwrap();
        inbox.push(b"Solve").unwrap();
        inbox.push(b"reset").unwrap();

        let outcomes = router.route(&mut inbox, &mut machine, 0, &mut strip);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[1],
            RouteOutcome::Dispatched {
                command: InboundCommand::Solve,
                outcome: CommandOutcome::Started(SequenceKind::Solve),
            }
        );

        // Reset waits for the solve sequence
        assert_eq!(inbox.len(), 1);
        let outcomes = router.route(&mut inbox, &mut machine, 100, &mut strip);
        assert!(outcomes.is_empty());
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn test_empty_inbox() {
        let mut router = CommandRouter::new();
        let mut machine = machine();
        let outcomes = router.route(&mut Inbox::new(), &mut machine, 0, &mut MockStrip::new());
        assert!(outcomes.is_empty());
        assert_eq!(router.dispatched(), 0);
    }
}
