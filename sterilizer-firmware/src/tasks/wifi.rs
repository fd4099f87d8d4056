//! Wi-Fi tasks
//!
//! `cyw43_task` and `net_task` run the radio driver and the IP stack.
//! `wifi_task` serves join requests from the controller and publishes
//! whether the link is usable (associated and addressed by DHCP).

use cyw43::JoinOptions;
use cyw43_pio::PioSpi;
use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::Stack;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;

use crate::channels::{LinkRequest, LINK_REQUEST, LINK_UP};
use crate::config::{LINK_POLL_MS, WIFI_PASSWORD, WIFI_SSID};

/// Radio driver runner
#[embassy_executor::task]
pub async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// IP stack runner
#[embassy_executor::task]
pub async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Wi-Fi task - joins on request and tracks link state
#[embassy_executor::task]
pub async fn wifi_task(mut control: cyw43::Control<'static>, stack: Stack<'static>) {
    info!("Wi-Fi task started");

    loop {
        let poll = Timer::after(Duration::from_millis(LINK_POLL_MS));
        if let Either::First(request) = select(LINK_REQUEST.wait(), poll).await {
            if !stack.is_link_up() {
                join(&mut control, request).await;
            }
        }

        let up = stack.is_link_up() && stack.is_config_up();
        if LINK_UP.swap(up, Ordering::AcqRel) != up {
            if up {
                if let Some(config) = stack.config_v4() {
                    info!("Link up, address {}", config.address);
                }
            } else {
                warn!("Link down");
            }
        }
    }
}

/// One association attempt
///
/// Failure is only logged; the controller's reconnect timer decides
/// when to ask again.
async fn join(control: &mut cyw43::Control<'static>, request: LinkRequest) {
    info!("Joining {} ({:?})", WIFI_SSID, request);

    let options = if WIFI_PASSWORD.is_empty() {
        JoinOptions::new_open()
    } else {
        JoinOptions::new(WIFI_PASSWORD.as_bytes())
    };

    match control.join(WIFI_SSID, options).await {
        Ok(()) => info!("Associated with {}", WIFI_SSID),
        Err(e) => warn!("Join failed: status {}", e.status),
    }
}
