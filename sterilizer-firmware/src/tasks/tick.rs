//! Tick task
//!
//! Drives the controller at a fixed rate with a wrapping millisecond
//! timestamp.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

use crate::config::TICK_INTERVAL_MS;

/// Signal to notify controller of tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with timestamp
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;

        // Truncation wraps after ~49 days; the core compares with wrapping_sub
        TICK_SIGNAL.signal(Instant::now().as_millis() as u32);
    }
}
