//! Puzzle state machine
//!
//! The puzzle state only moves forward, except that an explicit reset
//! takes a solved prop back to running. Actuation happens in timed
//! sequences; see [`sequence`].

pub mod events;
pub mod machine;
pub mod sequence;

pub use events::Event;
pub use machine::PuzzleState;
pub use sequence::{ActuatorSet, Sequence, SequenceKind, Step};
