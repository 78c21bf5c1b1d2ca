//! Construction-time configuration for one sensor/light pairing.
//!
//! These are set by whoever integrates the board and are not changed by
//! the hub at runtime. The thresholds and local poll interval here are
//! only the boot values; the hub overrides them with an `inputs` message.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::app::zone::Thresholds;
use crate::error::{Error, Result};
use crate::pins;

/// Longest device or channel name the bus framing accepts.
pub const MAX_NAME_LEN: usize = 32;

/// Echo wait bound. The HC-SR04 holds echo high for ~38 ms when nothing
/// is in range; 30 ms covers its rated 4 m with margin.
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = 30_000;

/// Core driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Name the hub knows this device by; prefixes every status message.
    pub device_name: String<MAX_NAME_LEN>,
    /// Outer polling interval (seconds). Seeds the report interval.
    pub poll_interval_secs: u32,
    /// Delay before the first poll (seconds), staggers sensors.
    pub poll_offset_secs: u32,
    pub trigger_pin: u8,
    pub echo_pin: u8,
    /// Hub device that receives colour commands.
    pub indicator_channel: String<MAX_NAME_LEN>,
    pub echo_timeout_us: u32,
    /// Local re-sample cadence (milliseconds) until the hub sends one.
    pub local_poll_ms: u32,
    pub thresholds: Thresholds,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            device_name: name("trafficlight1"),
            poll_interval_secs: 60,
            poll_offset_secs: 0,
            trigger_pin: pins::ULTRASONIC_TRIGGER_GPIO,
            echo_pin: pins::ULTRASONIC_ECHO_GPIO,
            indicator_channel: name(pins::INDICATOR_CHANNEL),
            echo_timeout_us: DEFAULT_ECHO_TIMEOUT_US,
            local_poll_ms: 1000,
            thresholds: Thresholds::default(),
        }
    }
}

impl DriverConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters the driver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !is_bus_token(&self.device_name) {
            return Err(Error::Config("device_name must be one non-empty word"));
        }
        if !is_bus_token(&self.indicator_channel) {
            return Err(Error::Config("indicator_channel must be one non-empty word"));
        }
        if self.trigger_pin == self.echo_pin {
            return Err(Error::Config("trigger and echo must be different pins"));
        }
        let hub_pins = [pins::HUB_UART_TX_GPIO, pins::HUB_UART_RX_GPIO];
        if hub_pins.contains(&self.trigger_pin) || hub_pins.contains(&self.echo_pin) {
            return Err(Error::Config("ranger pins clash with the hub UART"));
        }
        if self.local_poll_ms == 0 {
            return Err(Error::Config("local_poll_ms must be non-zero"));
        }
        if self.echo_timeout_us == 0 {
            return Err(Error::Config("echo_timeout_us must be non-zero"));
        }
        if !self.thresholds.is_ascending() {
            return Err(Error::Config("thresholds must be ascending"));
        }
        Ok(())
    }

    /// Initial spacing of status reports, in milliseconds.
    pub fn report_interval_ms(&self) -> u64 {
        u64::from(self.poll_interval_secs) * 1000
    }

    pub fn poll_offset_ms(&self) -> u64 {
        u64::from(self.poll_offset_secs) * 1000
    }
}

/// Names travel space-delimited on the bus, so they must be one word.
fn is_bus_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

/// Copy `s`, cut at the last whole character that fits.
fn name(s: &str) -> String<MAX_NAME_LEN> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
