//! Events that trigger state transitions

/// Events that can trigger puzzle state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// First orchestrator tick ran
    BootComplete,
    /// Solve sequence ran to completion
    SolveFinished,
    /// Reset sequence ran to completion
    ResetFinished,
}
