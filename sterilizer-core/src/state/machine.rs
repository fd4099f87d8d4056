//! Puzzle state definition

use super::events::Event;

/// Puzzle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PuzzleState {
    /// Power-on; left on the first tick
    #[default]
    Initializing,
    /// Armed, waiting for the trigger or a host command
    Running,
    /// Lock released; held until a reset
    Solved,
}

impl PuzzleState {
    /// Check if the trigger and host commands are acted on
    pub fn accepts_input(&self) -> bool {
        !matches!(self, PuzzleState::Initializing)
    }

    /// Check if the lock must be held released
    pub fn is_solved(&self) -> bool {
        matches!(self, PuzzleState::Solved)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use PuzzleState::*;

        match (self, event) {
            (Initializing, BootComplete) => Running,

            (Running, SolveFinished) => Solved,
            // Resetting an unsolved prop re-arms it in place
            (Running, ResetFinished) => Running,

            (Solved, ResetFinished) => Running,

            // Default: stay in current state
            _ => self,
        }
    }
}
