//! Game-host wire vocabulary
//!
//! The Sterilizer talks to the escape-room game host over MQTT using plain
//! text payloads on two fixed topics:
//!
//! ```text
//!  game host ──► ToDevice/Sterilizer ──► prop     "solve" | "reset"
//!  game host ◄── ToHost/Sterilizer   ◄── prop     status notifications
//! ```
//!
//! Commands are matched case-insensitively. Anything outside the vocabulary
//! decodes to [`InboundCommand::Unrecognized`] rather than an error, so a
//! malformed payload can never stop the prop.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod messages;
pub mod topics;

pub use command::{InboundCommand, Payload};
pub use messages::HostMessage;
pub use topics::{
    BROKER_PORT, DEVICE_ID, DEVICE_TOPIC, HOST_TOPIC, MAX_CLIENT_ID_LEN, MAX_PAYLOAD_SIZE,
};
