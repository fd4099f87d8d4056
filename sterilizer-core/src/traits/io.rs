//! Relay outputs and the trigger sensor

/// A relay-driven actuator (flame, pump, lock)
pub trait Relay {
    /// Energize or release the relay
    fn set_on(&mut self, on: bool);

    /// Check if the relay is currently energized
    fn is_on(&self) -> bool;
}

/// The physical trigger switch
///
/// Implementations hide the electrical polarity: `true` always means
/// the switch is closed.
pub trait TriggerSensor {
    /// Check if the switch is closed
    ///
    /// Takes `&mut self` because reading a pin may require mutable access.
    fn is_triggered(&mut self) -> bool;
}
