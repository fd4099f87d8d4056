//! Board-agnostic core logic for the Sterilizer prop
//!
//! This crate contains all application logic that does not depend on
//! specific hardware or network stacks:
//!
//! - Collaborator traits (link, broker session, LED strip, relays, sensor)
//! - Link and broker connectivity monitors with bounded reconnection
//! - Connection status indicator
//! - Puzzle state machine and its timed actuation sequences
//! - Inbound command queue and router
//! - The per-tick orchestrator, [`Device`]
//!
//! Everything is driven by [`Device::tick`] with a millisecond timestamp.
//! Nothing in here blocks or sleeps.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod animation;
pub mod command;
pub mod config;
pub mod connectivity;
pub mod device;
pub mod indicator;
#[cfg(test)]
mod mock;
pub mod puzzle;
pub mod state;
pub mod traits;

pub use device::{Device, TickReport};
