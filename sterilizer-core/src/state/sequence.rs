//! Timed actuation sequences
//!
//! A sequence is a fixed table of steps. Each step sets the relay outputs
//! on entry, renders an [`Effect`] while it runs and lasts a fixed time.
//! The sequence is advanced from the tick with the current timestamp, so
//! the device keeps servicing the network while flames burn.

use heapless::Vec;

use crate::animation::{Color, Effect};
use crate::config::{TimingConfig, MAX_SEQUENCE_STEPS};
use crate::traits::LedStrip;

/// Desired relay outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorSet {
    pub flames: bool,
    pub pump: bool,
    /// Lock relay; energized releases the exit
    pub lock: bool,
}

impl ActuatorSet {
    pub const ALL_OFF: Self = Self {
        flames: false,
        pump: false,
        lock: false,
    };

    pub const FLAMES: Self = Self {
        flames: true,
        pump: false,
        lock: false,
    };

    pub const FLAMES_AND_PUMP: Self = Self {
        flames: true,
        pump: true,
        lock: false,
    };

    /// Solved outputs: effects off, lock released
    pub const RELEASED: Self = Self {
        flames: false,
        pump: false,
        lock: true,
    };
}

/// Which sequence is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceKind {
    /// Power-on cue
    Boot,
    /// Flames, pump, release
    Solve,
    /// Everything off, color cue
    Reset,
}

/// One row of a sequence table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Outputs applied on entry; `None` leaves them as they are
    pub outputs: Option<ActuatorSet>,
    pub effect: Effect,
    /// Zero-length steps complete on the tick they are entered
    pub duration_ms: u32,
}

impl Step {
    pub const fn new(outputs: Option<ActuatorSet>, effect: Effect, duration_ms: u32) -> Self {
        Self {
            outputs,
            effect,
            duration_ms,
        }
    }

    const fn pause(duration_ms: u32) -> Self {
        Self::new(None, Effect::Hold, duration_ms)
    }
}

/// A running sequence
#[derive(Debug, Clone)]
pub struct Sequence {
    kind: SequenceKind,
    steps: Vec<Step, MAX_SEQUENCE_STEPS>,
    index: usize,
    step_started_ms: u32,
    entered: bool,
    last_frame: Option<u32>,
    frame_ms: u32,
}

impl Sequence {
    /// Build a sequence from a step table, starting at `now_ms`
    ///
    /// Steps beyond [`MAX_SEQUENCE_STEPS`] are ignored.
    pub fn new(kind: SequenceKind, steps: &[Step], frame_ms: u32, now_ms: u32) -> Self {
        Self {
            kind,
            steps: steps.iter().take(MAX_SEQUENCE_STEPS).copied().collect(),
            index: 0,
            step_started_ms: now_ms,
            entered: false,
            last_frame: None,
            frame_ms,
        }
    }

    /// Flames, then flames and pump under a blue sweep, then release
    pub fn solve(timing: &TimingConfig, now_ms: u32) -> Self {
        let passes = timing.pump_sweep_passes;
        let sweep = Effect::Sweep {
            color: Color::BLUE,
            passes,
        };
        let steps = [
            Step::new(
                Some(ActuatorSet::FLAMES),
                Effect::Hold,
                timing.flame_dwell_ms,
            ),
            Step::new(
                Some(ActuatorSet::FLAMES_AND_PUMP),
                sweep,
                passes as u32 * timing.sweep_pass_ms(),
            ),
            Step::new(Some(ActuatorSet::RELEASED), Effect::Fill(Color::GREEN), 0),
        ];
        Self::new(SequenceKind::Solve, &steps, timing.sweep_frame_ms, now_ms)
    }

    /// All outputs off, then the green/blue/red cue ending in solid red
    pub fn reset(timing: &TimingConfig, now_ms: u32) -> Self {
        Self::color_cue(SequenceKind::Reset, timing, now_ms)
    }

    /// Power-on cue; same table as the reset
    pub fn boot(timing: &TimingConfig, now_ms: u32) -> Self {
        Self::color_cue(SequenceKind::Boot, timing, now_ms)
    }

    fn color_cue(kind: SequenceKind, timing: &TimingConfig, now_ms: u32) -> Self {
        let pass = timing.sweep_pass_ms();
        let pause = timing.cue_pause_ms;
        let sweep = |color| Effect::Sweep { color, passes: 1 };
        let steps = [
            Step::new(Some(ActuatorSet::ALL_OFF), sweep(Color::GREEN), pass),
            Step::pause(pause),
            Step::new(None, sweep(Color::BLUE), pass),
            Step::pause(pause),
            Step::new(None, sweep(Color::RED), pass),
            Step::pause(pause),
            Step::new(None, Effect::Fill(Color::RED), pause),
        ];
        Self::new(kind, &steps, timing.sweep_frame_ms, now_ms)
    }

    /// Advance to `now_ms`
    ///
    /// `apply` receives the outputs of every step entered. Late ticks
    /// catch up by completing overdue steps back to back. Returns true
    /// once the last step has completed.
    pub fn advance<L, F>(&mut self, now_ms: u32, strip: &mut L, mut apply: F) -> bool
    where
        L: LedStrip,
        F: FnMut(ActuatorSet),
    {
        while let Some(step) = self.steps.get(self.index).copied() {
            if !self.entered {
                if let Some(outputs) = step.outputs {
                    apply(outputs);
                }
                self.entered = true;
                self.last_frame = None;
            }

            let elapsed = now_ms.wrapping_sub(self.step_started_ms);
            self.last_frame = step
                .effect
                .render(strip, elapsed, self.frame_ms, self.last_frame);

            if elapsed < step.duration_ms {
                return false;
            }

            self.step_started_ms = self.step_started_ms.wrapping_add(step.duration_ms);
            self.index += 1;
            self.entered = false;
        }
        true
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Index of the current step
    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Total length of the table
    pub fn duration_ms(&self) -> u32 {
        self.steps.iter().map(|s| s.duration_ms).sum()
    }
}
