//! Topic names and session identifiers

/// Client identifier presented to the broker
pub const DEVICE_ID: &str = "Sterilizer";

/// Topic the prop subscribes to for commands from the game host
pub const DEVICE_TOPIC: &str = "ToDevice/Sterilizer";

/// Topic the prop publishes status notifications on
pub const HOST_TOPIC: &str = "ToHost/Sterilizer";

/// Longest client identifier every MQTT 3.1.1 broker must accept
pub const MAX_CLIENT_ID_LEN: usize = 23;

/// Broker TCP port
pub const BROKER_PORT: u16 = 1883;

/// Largest inbound payload kept, in bytes
///
/// Longer payloads are truncated and can no longer match a command.
pub const MAX_PAYLOAD_SIZE: usize = 64;
