//! Connectivity monitoring
//!
//! Tracks the two external channels of the prop: the wireless link and the
//! broker session on top of it. Each monitor owns its collaborator and a
//! [`ReconnectTimer`], retries within a bounded budget, and reports a
//! [`ConnectionStatus`]. Failures never propagate as errors; the puzzle keeps
//! running with no connectivity at all.

pub mod broker;
pub mod link;
pub mod status;
pub mod timer;

pub use broker::BrokerMonitor;
pub use link::LinkMonitor;
pub use status::{ConnectionStatus, Fault};
pub use timer::ReconnectTimer;
