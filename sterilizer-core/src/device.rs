//! Per-tick orchestrator
//!
//! [`Device`] owns every collaborator and runs one pass of the prop logic
//! per call to [`Device::tick`]:
//!
//! 1. First tick only: `Initializing` -> `Running`
//! 2. Link check
//! 3. Broker check, then inbound messages into the inbox
//! 4. Status indicator, unless the puzzle is drawing on the strip
//! 5. Running sequence (or the solved hold)
//! 6. Trigger switch
//! 7. Queued commands
//! 8. Host notifications for whatever finished this tick
//!
//! The tick never blocks. What happened is returned as a [`TickReport`]
//! for the caller to log.

use heapless::Vec;
use sterilizer_protocol::{HostMessage, DEVICE_ID, DEVICE_TOPIC};

use crate::command::{CommandRouter, Inbox, RouteOutcome};
use crate::config::{DeviceConfig, INBOX_DEPTH};
use crate::connectivity::{BrokerMonitor, ConnectionStatus, Fault, LinkMonitor};
use crate::indicator::{Signal, StatusIndicator};
use crate::puzzle::{CommandOutcome, PuzzleEvent, PuzzleMachine, Relays};
use crate::traits::{BrokerSession, LedStrip, LinkTransport, Relay, TriggerSensor};

/// Puzzle events a single tick can produce
const MAX_TICK_EVENTS: usize = 4;

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// This tick moved the puzzle out of `Initializing`
    pub booted: bool,
    pub link: ConnectionStatus,
    pub broker: ConnectionStatus,
    /// Indicator signal painted this tick
    pub signal: Option<Signal>,
    pub events: Vec<PuzzleEvent, MAX_TICK_EVENTS>,
    pub routed: Vec<RouteOutcome, INBOX_DEPTH>,
    /// Notifications and whether the broker took them
    pub published: Vec<(HostMessage, bool), MAX_TICK_EVENTS>,
    /// Inbound messages dropped on a full inbox since boot
    pub dropped_inbound: u32,
    /// Commands handed to the puzzle since boot
    pub commands_dispatched: u32,
    /// Payloads that matched no command since boot
    pub commands_unrecognized: u32,
}

impl TickReport {
    /// Fault conditions visible in this tick
    pub fn faults(&self) -> Vec<Fault, 8> {
        let mut faults = Vec::new();
        let unrecognized = self
            .routed
            .iter()
            .filter(|r| matches!(r, RouteOutcome::Unrecognized(_)))
            .map(|_| Fault::UnrecognizedCommand);

        for fault in Fault::for_link(self.link)
            .into_iter()
            .chain(Fault::for_broker(self.broker))
            .chain(unrecognized)
        {
            if faults.push(fault).is_err() {
                break;
            }
        }
        faults
    }

    /// Check if anything worth logging above debug happened
    pub fn is_notable(&self) -> bool {
        self.booted
            || self.signal.is_some()
            || !self.events.is_empty()
            || !self.routed.is_empty()
            || !self.published.is_empty()
    }
}

/// The whole prop
pub struct Device<T, B, S, R, L> {
    link: LinkMonitor<T>,
    broker: BrokerMonitor<B>,
    indicator: StatusIndicator,
    puzzle: PuzzleMachine<R>,
    router: CommandRouter,
    inbox: Inbox,
    sensor: S,
    strip: L,
    /// The puzzle drew on the strip during the previous tick
    strip_owned: bool,
}

impl<T, B, S, R, L> Device<T, B, S, R, L>
where
    T: LinkTransport,
    B: BrokerSession,
    S: TriggerSensor,
    R: Relay,
    L: LedStrip,
{
    /// Assemble the device; relays are forced off here
    pub fn new(
        config: &DeviceConfig,
        transport: T,
        session: B,
        sensor: S,
        relays: Relays<R>,
        strip: L,
    ) -> Self {
        let timing = config.timing;
        Self {
            link: LinkMonitor::new(transport, timing.link_timeout_ms, config.retry),
            broker: BrokerMonitor::new(
                session,
                DEVICE_ID,
                DEVICE_TOPIC,
                timing.broker_timeout_ms,
                config.retry,
            ),
            indicator: StatusIndicator::new(),
            puzzle: PuzzleMachine::new(relays, timing),
            router: CommandRouter::new(),
            inbox: Inbox::new(),
            sensor,
            strip,
            strip_owned: false,
        }
    }

    /// Start the link and the power-on cue
    pub fn start(&mut self, now_ms: u32) {
        self.link.start(now_ms);
        self.broker.start(now_ms);
        self.puzzle.begin_boot_cue(now_ms, &mut self.strip);
    }

    /// Run one pass of the prop logic
    pub fn tick(&mut self, now_ms: u32) -> TickReport {
        let booted = self.puzzle.advance_boot();

        let link = self.link.check(now_ms);
        let broker = self.broker.check(now_ms, link);
        self.broker.pump_incoming(&mut self.inbox);

        let signal = self.update_indicator(link, broker);

        let mut events = Vec::new();
        if let Some(event) = self.puzzle.tick(now_ms, &mut self.strip) {
            let _ = events.push(event);
        }

        let closed = self.sensor.is_triggered();
        if let Some(event) = self.puzzle.poll(closed, now_ms, &mut self.strip) {
            let _ = events.push(event);
        }

        let routed = self
            .router
            .route(&mut self.inbox, &mut self.puzzle, now_ms, &mut self.strip);
        for outcome in &routed {
            if let RouteOutcome::Dispatched {
                outcome: CommandOutcome::Started(kind),
                ..
            } = outcome
            {
                let _ = events.push(PuzzleEvent::SequenceStarted(*kind));
            }
        }

        let mut published = Vec::new();
        for message in events.iter().filter_map(|e| e.notification()) {
            let sent = self.broker.publish(message.topic(), message.payload());
            let _ = published.push((message, sent));
        }

        TickReport {
            booted,
            link,
            broker,
            signal,
            events,
            routed,
            published,
            dropped_inbound: self.inbox.dropped(),
            commands_dispatched: self.router.dispatched(),
            commands_unrecognized: self.router.unrecognized(),
        }
    }

    fn update_indicator(
        &mut self,
        link: ConnectionStatus,
        broker: ConnectionStatus,
    ) -> Option<Signal> {
        if self.puzzle.owns_strip() {
            self.strip_owned = true;
            return None;
        }
        if self.strip_owned {
            // Strip was painted by a sequence; repaint the status
            self.indicator.invalidate();
            self.strip_owned = false;
        }

        let signal = self.indicator.update(link, broker)?;
        self.strip.set_all(signal.color());
        self.strip.show();
        Some(signal)
    }

    pub fn link(&self) -> &LinkMonitor<T> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut LinkMonitor<T> {
        &mut self.link
    }

    pub fn broker(&self) -> &BrokerMonitor<B> {
        &self.broker
    }

    pub fn broker_mut(&mut self) -> &mut BrokerMonitor<B> {
        &mut self.broker
    }

    pub fn puzzle(&self) -> &PuzzleMachine<R> {
        &self.puzzle
    }

    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn strip(&self) -> &L {
        &self.strip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Color;
    use crate::mock::{MockBroker, MockRelay, MockSensor, MockStrip, MockTransport};
    use crate::state::{ActuatorSet, PuzzleState, SequenceKind};
    use sterilizer_protocol::InboundCommand;

    type TestDevice = Device<MockTransport, MockBroker, MockSensor, MockRelay, MockStrip>;

    const TICK: u32 = 10;
    const BOOT_CUE_MS: u32 = 3 * 1_700 + 4 * 500;

    fn device() -> TestDevice {
        let relays = Relays::new(
            MockRelay::default(),
            MockRelay::default(),
            MockRelay::default(),
        );
        let mut device = Device::new(
            &DeviceConfig::DEFAULT,
            MockTransport::new(),
            MockBroker::accepting(),
            MockSensor::default(),
            relays,
            MockStrip::new(),
        );
        device.start(0);
        device
    }

    /// Tick until `until`, collecting reports
    fn run(device: &mut TestDevice, from: u32, until: u32) -> std::vec::Vec<TickReport> {
        let mut reports = std::vec::Vec::new();
        let mut now = from;
        while now < until {
            now += TICK;
            reports.push(device.tick(now));
        }
        reports
    }

    fn all_events(reports: &[TickReport]) -> std::vec::Vec<PuzzleEvent> {
        reports
            .iter()
            .flat_map(|r| r.events.iter().copied())
            .collect()
    }

    fn all_published(reports: &[TickReport]) -> std::vec::Vec<(HostMessage, bool)> {
        reports
            .iter()
            .flat_map(|r| r.published.iter().copied())
            .collect()
    }

    #[test]
    fn test_first_tick_boots() {
        let mut device = device();
        assert_eq!(device.puzzle().state(), PuzzleState::Initializing);

        let report = device.tick(TICK);
        assert!(report.booted);
        assert_eq!(device.puzzle().state(), PuzzleState::Running);
        assert!(!device.tick(2 * TICK).booted);
    }

    #[test]
    fn test_indicator_waits_for_boot_cue() {
        let mut device = device();

        let reports = run(&mut device, 0, BOOT_CUE_MS - TICK);
        assert!(reports.iter().all(|r| r.signal.is_none()));

        let reports = run(&mut device, BOOT_CUE_MS - TICK, BOOT_CUE_MS + 2 * TICK);
        assert!(all_events(&reports).contains(&PuzzleEvent::BootCueFinished));
        let signals: std::vec::Vec<_> = reports.iter().filter_map(|r| r.signal).collect();
        assert_eq!(signals, [Signal::NoNetwork]);
        assert!(device.strip().is_solid(Color::PURPLE));
    }

    #[test]
    fn test_indicator_follows_connectivity() {
        let mut device = device();
        let mut now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);

        device.link_mut().transport_mut().up = true;
        now += TICK;
        let report = device.tick(now);
        // Broker connects in the same tick as the link is seen up
        assert_eq!(report.link, ConnectionStatus::Connected);
        assert_eq!(report.broker, ConnectionStatus::Connected);
        assert_eq!(report.signal, Some(Signal::Online));
        assert!(device.strip().is_solid(Color::RED));

        device.broker_mut().session_mut().accept = false;
        device.broker_mut().session_mut().drop_session();
        now += TICK;
        assert_eq!(device.tick(now).signal, Some(Signal::BrokerDown));
        now += TICK;
        assert_eq!(device.tick(now).signal, None);

        device.link_mut().transport_mut().up = false;
        now += TICK;
        let report = device.tick(now);
        assert_eq!(report.signal, Some(Signal::NoNetwork));
        assert!(report.faults().contains(&Fault::LinkUnavailable));
    }

    #[test]
    fn test_sensor_ignored_during_boot_cue() {
        let mut device = device();
        device.sensor_mut().closed = true;

        let reports = run(&mut device, 0, BOOT_CUE_MS - TICK);
        assert!(all_events(&reports).is_empty());
        assert_eq!(device.puzzle().actuators(), ActuatorSet::ALL_OFF);
    }

    #[test]
    fn test_boot_solve_reset_end_to_end() {
        let mut device = device();
        device.link_mut().transport_mut().up = true;

        let mut now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);
        assert!(device.broker().is_subscribed());
        assert_eq!(
            device.broker().session().subscriptions[0].as_str(),
            DEVICE_TOPIC
        );

        // Player closes the switch
        device.sensor_mut().closed = true;
        now += TICK;
        let report = device.tick(now);
        assert_eq!(
            &report.events[..],
            &[PuzzleEvent::SequenceStarted(SequenceKind::Solve)]
        );
        assert_eq!(device.puzzle().actuators(), ActuatorSet::FLAMES);
        device.sensor_mut().closed = false;

        // Host sends reset mid-sequence; it waits
        device.broker_mut().session_mut().queue(b"reset");
        let reports = run(&mut device, now, now + 5_000 + 6 * 1_700 + TICK);
        now += 5_000 + 6 * 1_700 + TICK;

        let events = all_events(&reports);
        let solved_at = events
            .iter()
            .position(|e| *e == PuzzleEvent::Solved)
            .unwrap();
        let reset_at = events
            .iter()
            .position(|e| *e == PuzzleEvent::SequenceStarted(SequenceKind::Reset))
            .unwrap();
        assert!(reset_at > solved_at);

        let published = all_published(&reports);
        assert_eq!(published[0], (HostMessage::Solved, true));
        assert_eq!(
            device.broker().session().published_texts()[0],
            "Sterilizer puzzle has been solved!"
        );

        // Reset runs to completion, then the indicator takes the strip back
        let reports = run(&mut device, now, now + BOOT_CUE_MS + 2 * TICK);
        assert!(all_events(&reports).contains(&PuzzleEvent::Reset));
        assert!(reports.iter().any(|r| r.signal == Some(Signal::Online)));
        assert_eq!(device.puzzle().state(), PuzzleState::Running);
        assert_eq!(device.puzzle().actuators(), ActuatorSet::ALL_OFF);
        assert_eq!(
            device.broker().session().published_texts()[1],
            "Sterilizer has been reset!"
        );
    }

    #[test]
    fn test_solve_command_when_solved_is_noop() {
        let mut device = device();
        device.link_mut().transport_mut().up = true;
        let mut now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);

        device.broker_mut().session_mut().queue(b"solve");
        run(&mut device, now, now + 20_000);
        now += 20_000;
        assert_eq!(device.puzzle().state(), PuzzleState::Solved);

        device.broker_mut().session_mut().queue(b"SOLVE");
        let report = device.tick(now + TICK);
        assert_eq!(
            &report.routed[..],
            &[RouteOutcome::Dispatched {
                command: InboundCommand::Solve,
                outcome: CommandOutcome::AlreadySolved,
            }]
        );
        assert!(report.published.is_empty());
        assert_eq!(device.broker().session().published.len(), 1);
        assert!(device.strip().is_solid(Color::GREEN));
    }

    #[test]
    fn test_solves_without_network() {
        let mut device = device();
        let mut now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);

        device.sensor_mut().closed = true;
        let reports = run(&mut device, now, now + 20_000);
        now += 20_000;

        assert_eq!(device.puzzle().state(), PuzzleState::Solved);
        assert_eq!(device.puzzle().actuators(), ActuatorSet::RELEASED);
        // Notification is lost, not queued
        assert_eq!(all_published(&reports), [(HostMessage::Solved, false)]);

        device.link_mut().transport_mut().up = true;
        run(&mut device, now, now + 100);
        assert!(device.broker().session().published.is_empty());
    }

    #[test]
    fn test_unrecognized_command_reported() {
        let mut device = device();
        device.link_mut().transport_mut().up = true;
        let now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);

        device.broker_mut().session_mut().queue(b"open sesame");
        let report = device.tick(now + TICK);
        assert!(report.faults().contains(&Fault::UnrecognizedCommand));
        assert!(report.is_notable());
        assert_eq!(report.commands_unrecognized, 1);
        assert_eq!(report.commands_dispatched, 0);
        assert_eq!(device.puzzle().state(), PuzzleState::Running);
    }

    #[test]
    fn test_command_counters_accumulate() {
        let mut device = device();
        device.link_mut().transport_mut().up = true;
        let mut now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);

        device.broker_mut().session_mut().queue(b"blink");
        device.broker_mut().session_mut().queue(b"solve");
        now += TICK;
        let report = device.tick(now);
        assert_eq!(report.commands_unrecognized, 1);
        assert_eq!(report.commands_dispatched, 1);

        // Counters carry over to quiet ticks
        let report = device.tick(now + TICK);
        assert!(report.routed.is_empty());
        assert_eq!(report.commands_dispatched, 1);
    }

    #[test]
    fn test_oversized_command_not_acted_on() {
        let mut device = device();
        device.link_mut().transport_mut().up = true;
        let now = BOOT_CUE_MS + TICK;
        run(&mut device, 0, now);

        let mut wire = std::vec::Vec::new();
        wire.extend_from_slice(b"solve");
        wire.extend_from_slice(&[b' '; 70]);
        wire.extend_from_slice(b"not really");
        device.broker_mut().session_mut().queue(&wire);

        let report = device.tick(now + TICK);
        assert!(matches!(
            &report.routed[..],
            [RouteOutcome::Unrecognized(p)] if p.is_truncated()
        ));
        assert_eq!(device.puzzle().state(), PuzzleState::Running);
        assert!(!device.puzzle().is_busy());
    }

    #[test]
    fn test_link_retried_every_tick() {
        let mut device = device();
        let reports = run(&mut device, 0, 120_000 + 2 * TICK);

        assert_eq!(device.link().status(), ConnectionStatus::Disconnected);
        // Every tick retried, so the budget never ran out
        assert!(reports.iter().all(|r| r.link != ConnectionStatus::TimedOut));
        assert!(device.link().reconnects() > 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Input {
            Sensor(bool),
            Command(&'static [u8]),
            Wait(u32),
        }

        fn input() -> impl Strategy<Value = Input> {
            prop_oneof![
                any::<bool>().prop_map(Input::Sensor),
                prop_oneof![
                    Just(&b"solve"[..]),
                    Just(&b"RESET"[..]),
                    Just(&b"blink"[..]),
                    Just(&b""[..]),
                ]
                .prop_map(Input::Command),
                (1u32..5_000).prop_map(Input::Wait),
            ]
        }

        fn legal(from: PuzzleState, to: PuzzleState) -> bool {
            use PuzzleState::*;
            matches!(
                (from, to),
                (Initializing, Initializing)
                    | (Initializing, Running)
                    | (Running, Running)
                    | (Running, Solved)
                    | (Solved, Solved)
                    | (Solved, Running)
            )
        }

        proptest! {
            #[test]
            fn transitions_are_legal(inputs in proptest::collection::vec(input(), 1..60)) {
                let mut device = device();
                device.link_mut().transport_mut().up = true;
                let mut now = 0u32;
                let mut state = device.puzzle().state();
                let mut solves = 0usize;
                let mut solved_notes = 0usize;

                for input in inputs {
                    match input {
                        Input::Sensor(closed) => device.sensor_mut().closed = closed,
                        Input::Command(payload) => device.broker_mut().session_mut().queue(payload),
                        Input::Wait(ms) => {
                            // Let a few ticks pass
                            for _ in 0..(ms / 500).max(1) {
                                now += 500;
                                let report = device.tick(now);
                                solved_notes += report
                                    .published
                                    .iter()
                                    .filter(|(m, _)| *m == HostMessage::Solved)
                                    .count();

                                let next = device.puzzle().state();
                                prop_assert!(legal(state, next), "{:?} -> {:?}", state, next);
                                if state == PuzzleState::Running && next == PuzzleState::Solved {
                                    solves += 1;
                                }
                                state = next;

                                if !device.puzzle().is_busy() {
                                    let outputs = device.puzzle().actuators();
                                    prop_assert!(!outputs.flames && !outputs.pump);
                                    prop_assert_eq!(outputs.lock, state == PuzzleState::Solved);
                                }
                            }
                        }
                    }
                }
                prop_assert_eq!(solves, solved_notes);
            }
        }
    }
}
