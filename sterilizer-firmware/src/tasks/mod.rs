//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod leds;
pub mod mqtt;
pub mod tick;
pub mod wifi;

pub use controller::{controller_task, FirmwareDevice};
pub use leds::{led_task, FrameSender};
pub use mqtt::mqtt_task;
pub use tick::tick_task;
pub use wifi::{cyw43_task, net_task, wifi_task};
