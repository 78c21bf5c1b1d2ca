//! TrafficLight Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HcSr04 (PinDriver + Ets)  LineBus (UART1 tx)  SystemClock   │
//! │  bus-rx thread (UART1 rx) ──▶ mpsc channel                   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │     TrafficLightDriver (zones · blink · reports)   │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  PollingScheduler (cadence, offset, message routing)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::BufReader;

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_hal::uart::UART1;
use log::{info, warn};

use trafficlight::adapters::hub_uart;
use trafficlight::adapters::line_bus::{LineBus, spawn_line_reader};
use trafficlight::adapters::time::SystemClock;
use trafficlight::app::ports::Clock;
use trafficlight::app::service::TrafficLightDriver;
use trafficlight::config::DriverConfig;
use trafficlight::error::Error;
use trafficlight::pins;
use trafficlight::scheduler::PollingScheduler;
use trafficlight::sensors::HcSr04;

/// Longest sleep between passes, so hub messages are picked up promptly.
const MAX_IDLE_MS: u64 = 20;

fn load_config() -> DriverConfig {
    match option_env!("TRAFFICLIGHT_CONFIG_JSON") {
        Some(json) => DriverConfig::from_json(json).unwrap_or_else(|e| {
            warn!("Built-in config rejected ({}), using defaults", e);
            DriverConfig::default()
        }),
        None => DriverConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("TrafficLight v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();
    let clock = SystemClock::new();

    // ── 2. Ranger pins ────────────────────────────────────────
    // SAFETY: the pin numbers come from the board config and no other
    // driver in this firmware claims them.
    let trigger = PinDriver::output(unsafe { AnyOutputPin::new(i32::from(config.trigger_pin)) })?;
    let echo = PinDriver::input(unsafe { AnyInputPin::new(i32::from(config.echo_pin)) })?;
    let sensor = HcSr04::new(trigger, echo, Ets, clock, config.echo_timeout_us).map_err(Error::from)?;

    // ── 3. Driver + hub link ──────────────────────────────────
    // Logs stay on the UART0 console; the hub gets UART1 to itself.
    // SAFETY: UART1 and the hub pins are used nowhere else.
    let (hub_tx, hub_rx) = unsafe {
        hub_uart::open(
            UART1::new(),
            pins::HUB_UART_TX_GPIO,
            pins::HUB_UART_RX_GPIO,
            pins::HUB_UART_BAUD,
        )
    }?;
    let inbound = spawn_line_reader(BufReader::new(hub_rx))?;

    let offset_ms = config.poll_offset_ms();
    let mut driver = TrafficLightDriver::new(config, sensor, LineBus::new(hub_tx), clock)?;

    let mut scheduler = PollingScheduler::new();
    if scheduler.add(&mut driver, offset_ms, clock.now_ms()).is_none() {
        anyhow::bail!("scheduler has no free slot");
    }

    // ── 4. Main loop ──────────────────────────────────────────
    loop {
        while let Ok(line) = inbound.try_recv() {
            scheduler.dispatch(&line);
        }

        scheduler.run_pending(clock.now_ms());

        let now = clock.now_ms();
        let wait_ms = scheduler
            .next_due_ms()
            .map_or(MAX_IDLE_MS, |due| due.saturating_sub(now))
            .clamp(1, MAX_IDLE_MS);
        FreeRtos::delay_ms(wait_ms as u32);
    }
}
