//! Sterilizer - Escape Room Prop Firmware
//!
//! Firmware for the "Sterilizer" prop on a Raspberry Pi Pico W. A trigger
//! switch (or a "solve" command from the game host over MQTT) runs the
//! flame and pump effects and releases the maglock; "reset" re-arms it.
//!
//! Wiring:
//! - GP2 flame relay, GP3 pump relay, GP4 maglock relay (active-high)
//! - GP5 trigger switch to ground
//! - GP16 WS2812 data
//! - GP23/24/25/29 CYW43 radio (fixed on the Pico W)

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_time::Instant;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sterilizer_core::config::{DeviceConfig, STRIP_BRIGHTNESS, STRIP_LEN};
use sterilizer_core::puzzle::Relays;
use sterilizer_core::Device;
use sterilizer_drivers::{BufferedStrip, GpioRelay, TriggerSwitch};

mod channels;
mod config;
mod net;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    PIO1_IRQ_0 => PioInterruptHandler<PIO1>;
});

// Static cells for the radio and IP stack (must live forever)
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sterilizer firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Relays first so nothing is energized while the radio boots
    let relays = Relays::new(
        GpioRelay::new_active_high(Output::new(p.PIN_2, Level::Low)),
        GpioRelay::new_active_high(Output::new(p.PIN_3, Level::Low)),
        GpioRelay::new_active_high(Output::new(p.PIN_4, Level::Low)),
    );
    let trigger = TriggerSwitch::new(Input::new(p.PIN_5, Pull::Up));
    info!("Relays and trigger initialized");

    // WS2812 strip on PIO1
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO1, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH1, p.PIN_16, &program);
    let strip = BufferedStrip::new(tasks::FrameSender, STRIP_BRIGHTNESS);
    info!("LED strip initialized ({} cells)", STRIP_LEN);

    // CYW43 radio on PIO0
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("Radio initialized");

    // IP stack with DHCP
    let seed = config::NET_SEED ^ Instant::now().as_ticks();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();

    let device: tasks::FirmwareDevice = Device::new(
        &DeviceConfig::DEFAULT,
        net::WifiLink,
        net::MqttSession,
        trigger,
        relays,
        strip,
    );

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::led_task(ws2812)).unwrap();
    spawner.spawn(tasks::wifi_task(control, stack)).unwrap();
    spawner.spawn(tasks::mqtt_task(stack)).unwrap();
    spawner.spawn(tasks::controller_task(device)).unwrap();

    info!("All tasks spawned, firmware running");
}
