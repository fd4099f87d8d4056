//! Main controller task
//!
//! Owns the [`Device`] and runs one tick per tick signal. Everything the
//! tick reports is logged here; the core itself never logs.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::Instant;

use sterilizer_core::config::STRIP_LEN;
use sterilizer_core::{Device, TickReport};
use sterilizer_drivers::{BufferedStrip, GpioRelay, TriggerSwitch};

use crate::net::{MqttSession, WifiLink};
use crate::tasks::leds::FrameSender;
use crate::tasks::tick::TICK_SIGNAL;

/// The prop as wired on the Pico W
pub type FirmwareDevice = Device<
    WifiLink,
    MqttSession,
    TriggerSwitch<Input<'static>>,
    GpioRelay<Output<'static>>,
    BufferedStrip<FrameSender, STRIP_LEN>,
>;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut device: FirmwareDevice) {
    info!("Controller task started");

    device.start(Instant::now().as_millis() as u32);
    info!("Boot cue running, joining network");

    loop {
        let now_ms = TICK_SIGNAL.wait().await;
        let report = device.tick(now_ms);
        log_report(&report);
    }
}

/// Log what a tick did, quietly unless something changed
fn log_report(report: &TickReport) {
    if !report.is_notable() {
        return;
    }

    if report.booted {
        info!("Puzzle running");
    }
    if let Some(signal) = report.signal {
        info!(
            "Indicator: {:?} (link {:?}, broker {:?})",
            signal, report.link, report.broker
        );
    }
    for event in &report.events {
        info!("Puzzle event: {:?}", event);
    }
    for outcome in &report.routed {
        debug!("Command: {:?}", outcome);
    }
    if !report.routed.is_empty() {
        debug!(
            "Commands so far: {} dispatched, {} unrecognized",
            report.commands_dispatched, report.commands_unrecognized
        );
    }
    for (message, sent) in &report.published {
        if *sent {
            info!("Notified host: {:?}", message);
        } else {
            warn!("Notification not sent: {:?}", message);
        }
    }
    for fault in &report.faults() {
        warn!("Fault: {:?}", fault);
    }
    if report.dropped_inbound > 0 {
        debug!("{} inbound messages dropped so far", report.dropped_inbound);
    }
}
