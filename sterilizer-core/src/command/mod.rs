//! Inbound command handling
//!
//! The broker session copies received payloads into the [`Inbox`]; the
//! [`CommandRouter`] drains it once per tick and dispatches decoded
//! commands to the puzzle machine.

pub mod inbox;
pub mod router;

pub use inbox::{Inbox, InboxFull};
pub use router::{CommandRouter, RouteOutcome};
pub use sterilizer_protocol::{InboundCommand, Payload};
