//! Inter-task communication channels
//!
//! The controller owns the `Device` and never awaits network or LED I/O.
//! Requests go out through these statics; results come back as flags
//! and queued messages that the controller polls once per tick.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::{String, Vec};
use portable_atomic::AtomicBool;
use smart_leds::RGB8;

use sterilizer_core::command::Payload;
use sterilizer_core::config::{INBOX_DEPTH, STRIP_LEN};
use sterilizer_protocol::{MAX_CLIENT_ID_LEN, MAX_PAYLOAD_SIZE};

/// Channel capacity for outgoing notifications
const OUTBOX_SIZE: usize = 4;

/// What the controller asks of the Wi-Fi task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkRequest {
    /// First association after boot
    Join,
    /// Association was lost, try again
    Rejoin,
}

/// A notification waiting to be published
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub topic: String<64>,
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// Client identifier handed to the MQTT task
pub type ClientId = String<MAX_CLIENT_ID_LEN>;

/// One full strip frame, brightness already applied
pub type Frame = [RGB8; STRIP_LEN];

/// Wi-Fi (re)association request
pub static LINK_REQUEST: Signal<CriticalSectionRawMutex, LinkRequest> = Signal::new();

/// Link is associated and has an address
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Broker session request, carrying the client ID to connect as
pub static BROKER_REQUEST: Signal<CriticalSectionRawMutex, ClientId> = Signal::new();

/// MQTT session is open and subscribed
pub static BROKER_UP: AtomicBool = AtomicBool::new(false);

/// Notifications from the controller to the MQTT task
pub static OUTBOX: Channel<CriticalSectionRawMutex, OutboundMessage, OUTBOX_SIZE> =
    Channel::new();

/// Command payloads from the MQTT task to the controller
pub static INBOUND: Channel<CriticalSectionRawMutex, Payload, INBOX_DEPTH> = Channel::new();

/// Latest strip frame for the LED task
pub static FRAME: Signal<CriticalSectionRawMutex, Frame> = Signal::new();
