//! Application core — the distance-activated indicator driver.
//!
//! Message parsing, zone classification, blinking and report throttling
//! live here.  All interaction with pins, clocks and the hub happens
//! through the **port traits** in [`ports`], so this layer is testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod zone;
