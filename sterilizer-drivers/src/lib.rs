//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator
//! traits defined in sterilizer-core on top of `embedded-hal` pins and
//! `smart-leds` writers:
//!
//! - Relay outputs (flames, pump, lock)
//! - Trigger switch input
//! - Buffered LED strip with global brightness
//!
//! Pin errors never panic. They are latched and exposed through
//! `has_fault()` so the firmware can log them.

#![no_std]
#![deny(unsafe_code)]

pub mod relay;
pub mod strip;
pub mod switch;

pub use relay::GpioRelay;
pub use strip::BufferedStrip;
pub use switch::TriggerSwitch;
