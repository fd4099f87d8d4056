//! Network proxies for the controller
//!
//! `WifiLink` and `MqttSession` implement the core's network traits
//! without touching the radio. They post requests to the Wi-Fi and MQTT
//! tasks and read back the state those tasks publish, so a controller
//! tick never waits on the network.

pub mod broker;
pub mod link;

pub use broker::MqttSession;
pub use link::WifiLink;
