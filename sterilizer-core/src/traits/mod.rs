//! Collaborator traits
//!
//! These traits define the interface between the prop logic and the
//! hardware/network implementations. The firmware implements them on top
//! of embassy tasks; tests implement them with simple mocks.

pub mod io;
pub mod led;
pub mod network;

pub use io::{Relay, TriggerSensor};
pub use led::LedStrip;
pub use network::{BrokerSession, LinkTransport};
