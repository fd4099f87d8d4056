//! Puzzle machine
//!
//! Owns the three relays and the puzzle state, reacts to the trigger
//! switch and host commands, and runs the timed sequences.

use sterilizer_protocol::{HostMessage, InboundCommand};

use crate::config::TimingConfig;
use crate::state::{ActuatorSet, Event, PuzzleState, Sequence, SequenceKind};
use crate::traits::{LedStrip, Relay};

/// The three relay outputs
#[derive(Debug)]
pub struct Relays<R> {
    pub flames: R,
    pub pump: R,
    pub lock: R,
}

impl<R: Relay> Relays<R> {
    pub fn new(flames: R, pump: R, lock: R) -> Self {
        Self { flames, pump, lock }
    }

    /// Drive all three relays
    pub fn apply(&mut self, outputs: ActuatorSet) {
        self.flames.set_on(outputs.flames);
        self.pump.set_on(outputs.pump);
        self.lock.set_on(outputs.lock);
    }

    /// Current relay outputs
    pub fn outputs(&self) -> ActuatorSet {
        ActuatorSet {
            flames: self.flames.is_on(),
            pump: self.pump.is_on(),
            lock: self.lock.is_on(),
        }
    }
}

/// Result of handing a command to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// A sequence was started
    Started(SequenceKind),
    /// Solve while already solved; nothing to do
    AlreadySolved,
    /// A sequence is running; try again once it completes
    Busy,
    /// First tick has not run yet
    NotReady,
    /// Not a command the machine acts on
    Ignored,
}

/// Something the machine did that the outside world may care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PuzzleEvent {
    /// A sequence began
    SequenceStarted(SequenceKind),
    /// Solve sequence finished; lock released
    Solved,
    /// Reset sequence finished; prop armed
    Reset,
    /// Power-on cue finished; the strip is free again
    BootCueFinished,
}

impl PuzzleEvent {
    /// Host notification for this event, if one is sent
    pub fn notification(self) -> Option<HostMessage> {
        match self {
            PuzzleEvent::Solved => Some(HostMessage::Solved),
            PuzzleEvent::Reset => Some(HostMessage::Reset),
            PuzzleEvent::SequenceStarted(_) | PuzzleEvent::BootCueFinished => None,
        }
    }
}

/// Puzzle state, relays and the running sequence
#[derive(Debug)]
pub struct PuzzleMachine<R> {
    relays: Relays<R>,
    state: PuzzleState,
    sequence: Option<Sequence>,
    timing: TimingConfig,
}

impl<R: Relay> PuzzleMachine<R> {
    /// Create the machine with every relay forced off
    pub fn new(mut relays: Relays<R>, timing: TimingConfig) -> Self {
        relays.apply(ActuatorSet::ALL_OFF);
        Self {
            relays,
            state: PuzzleState::Initializing,
            sequence: None,
            timing,
        }
    }

    /// Leave `Initializing`
    ///
    /// Returns true on the call that made the transition.
    pub fn advance_boot(&mut self) -> bool {
        let next = self.state.transition(Event::BootComplete);
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Start the power-on cue
    pub fn begin_boot_cue<L: LedStrip>(&mut self, now_ms: u32, strip: &mut L) {
        self.start(Sequence::boot(&self.timing, now_ms), now_ms, strip);
    }

    /// React to the trigger switch
    pub fn poll<L: LedStrip>(
        &mut self,
        sensor_closed: bool,
        now_ms: u32,
        strip: &mut L,
    ) -> Option<PuzzleEvent> {
        if !sensor_closed || self.is_busy() || self.state != PuzzleState::Running {
            return None;
        }
        self.start(Sequence::solve(&self.timing, now_ms), now_ms, strip);
        Some(PuzzleEvent::SequenceStarted(SequenceKind::Solve))
    }

    /// React to a host command
    pub fn on_command<L: LedStrip>(
        &mut self,
        command: InboundCommand,
        now_ms: u32,
        strip: &mut L,
    ) -> CommandOutcome {
        if !command.is_recognized() {
            return CommandOutcome::Ignored;
        }
        if !self.state.accepts_input() {
            return CommandOutcome::NotReady;
        }
        if self.is_busy() {
            return CommandOutcome::Busy;
        }

        let sequence = match (command, self.state) {
            (InboundCommand::Solve, PuzzleState::Solved) => return CommandOutcome::AlreadySolved,
            (InboundCommand::Solve, _) => Sequence::solve(&self.timing, now_ms),
            (_, _) => Sequence::reset(&self.timing, now_ms),
        };
        let kind = sequence.kind();
        self.start(sequence, now_ms, strip);
        CommandOutcome::Started(kind)
    }

    fn start<L: LedStrip>(&mut self, mut sequence: Sequence, now_ms: u32, strip: &mut L) {
        let relays = &mut self.relays;
        // Completion is picked up by the next tick
        sequence.advance(now_ms, strip, |outputs| relays.apply(outputs));
        self.sequence = Some(sequence);
    }

    /// Advance the running sequence, or hold the solved outputs
    pub fn tick<L: LedStrip>(&mut self, now_ms: u32, strip: &mut L) -> Option<PuzzleEvent> {
        let Some(sequence) = self.sequence.as_mut() else {
            if self.state.is_solved() {
                self.relays.apply(ActuatorSet::RELEASED);
            }
            return None;
        };

        let relays = &mut self.relays;
        if !sequence.advance(now_ms, strip, |outputs| relays.apply(outputs)) {
            return None;
        }

        let kind = sequence.kind();
        self.sequence = None;
        Some(self.finish(kind))
    }

    fn finish(&mut self, kind: SequenceKind) -> PuzzleEvent {
        match kind {
            SequenceKind::Solve => {
                self.state = self.state.transition(Event::SolveFinished);
                self.relays.apply(ActuatorSet::RELEASED);
                PuzzleEvent::Solved
            }
            SequenceKind::Reset => {
                self.state = self.state.transition(Event::ResetFinished);
                PuzzleEvent::Reset
            }
            SequenceKind::Boot => PuzzleEvent::BootCueFinished,
        }
    }

    /// Check if a sequence is running
    pub fn is_busy(&self) -> bool {
        self.sequence.is_some()
    }

    /// Check if the puzzle is drawing on the strip
    ///
    /// True while a sequence runs and while solved (the strip stays green).
    pub fn owns_strip(&self) -> bool {
        self.is_busy() || self.state.is_solved()
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    /// Kind of the running sequence
    pub fn sequence_kind(&self) -> Option<SequenceKind> {
        self.sequence.as_ref().map(Sequence::kind)
    }

    /// Current relay outputs
    pub fn actuators(&self) -> ActuatorSet {
        self.relays.outputs()
    }

    pub fn relays(&self) -> &Relays<R> {
        &self.relays
    }

    pub fn relays_mut(&mut self) -> &mut Relays<R> {
        &mut self.relays
    }
}
