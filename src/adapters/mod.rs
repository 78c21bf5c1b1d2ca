//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements   | Connects to                     |
//! |--------------|--------------|---------------------------------|
//! | `line_bus`   | MessageBus   | hub serial link (line framed)   |
//! | `hub_uart`   | io::Read/Write | dedicated hub UART (board only) |
//! | `time`       | Clock        | ESP32 system timer / `Instant`  |
//!
//! The ultrasonic ranger lives in [`sensors`](crate::sensors) and talks to
//! pins through `embedded-hal`, so it needs no adapter of its own.

#[cfg(target_os = "espidf")]
pub mod hub_uart;
pub mod line_bus;
pub mod time;
