//! Board wiring and build-time secrets
//!
//! Pin numbers are for the Raspberry Pi Pico W. The credentials and the
//! broker address come from `secrets.toml` through the build script.

include!(concat!(env!("OUT_DIR"), "/secrets.rs"));

/// Controller tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 10;

/// How often the Wi-Fi task re-reads the link state
pub const LINK_POLL_MS: u64 = 500;

/// MQTT keep-alive read timeout in seconds
pub const MQTT_READ_TIMEOUT_S: u64 = 5;

/// TCP socket buffer size for the broker connection
pub const MQTT_SOCKET_BUFFER: usize = 1024;

/// Seed for the network stack's local port and ID randomization
pub const NET_SEED: u64 = 0x5354_4552_494c_495a;

// Relay outputs (GP2-GP4), trigger input (GP5) and strip data (GP16):
// see `main`, where the pins are claimed.
