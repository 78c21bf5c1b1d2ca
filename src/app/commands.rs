//! Inbound messages from the hub.
//!
//! The hub sends space-delimited ASCII lines addressed to this device:
//!
//! ```text
//! trafficlight1 inputs local_poll:500 proceed_distance:20 warning_distance:15 stop_distance:10 too_far_distance:5
//! trafficlight1 30
//! ```
//!
//! Parsing happens once, here; the driver only ever sees typed values.

use log::{debug, warn};

use crate::app::zone::Thresholds;
use crate::error::MessageError;

/// A parsed hub message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Bulk settings update (`inputs key:value ...`).
    Inputs(SettingsUpdate),
    /// Bare integer: seconds between upstream status reports.
    ReportInterval { secs: u32 },
}

/// The recognised keys carried by an `inputs` message.
///
/// A key that is absent, or whose value did not parse, stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub local_poll_ms: Option<u32>,
    pub proceed: Option<u16>,
    pub warning: Option<u16>,
    pub stop: Option<u16>,
    pub too_far: Option<u16>,
}

impl SettingsUpdate {
    pub fn touches_thresholds(&self) -> bool {
        self.proceed.is_some() || self.warning.is_some() || self.stop.is_some() || self.too_far.is_some()
    }

    /// `base` with every threshold this update carries replaced.
    pub fn merge_into(&self, base: Thresholds) -> Thresholds {
        Thresholds {
            too_far: self.too_far.unwrap_or(base.too_far),
            stop: self.stop.unwrap_or(base.stop),
            warning: self.warning.unwrap_or(base.warning),
            proceed: self.proceed.unwrap_or(base.proceed),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match key {
            "local_poll" => match value.parse::<u32>() {
                Ok(0) => warn!("inputs: local_poll:0 ignored"),
                Ok(ms) => self.local_poll_ms = Some(ms),
                Err(_) => warn!("inputs: bad value for local_poll: '{}'", value),
            },
            "proceed_distance" => self.proceed = parse_cm(key, value).or(self.proceed),
            "warning_distance" => self.warning = parse_cm(key, value).or(self.warning),
            "stop_distance" => self.stop = parse_cm(key, value).or(self.stop),
            "too_far_distance" => self.too_far = parse_cm(key, value).or(self.too_far),
            _ => debug!("inputs: unknown key '{}'", key),
        }
    }
}

fn parse_cm(key: &str, value: &str) -> Option<u16> {
    match value.parse::<u16>() {
        Ok(cm) => Some(cm),
        Err(_) => {
            warn!("inputs: bad value for {}: '{}'", key, value);
            None
        }
    }
}

impl InboundMessage {
    /// Parse `<deviceName> <body>`.
    ///
    /// The device name is not checked; routing by name is the bus's job.
    pub fn parse(raw: &str) -> Result<Self, MessageError> {
        let mut words = raw.split_whitespace();
        let _device = words.next().ok_or(MessageError::Empty)?;
        let first = words.next().ok_or(MessageError::Empty)?;

        if first == "inputs" {
            let mut update = SettingsUpdate::default();
            for pair in words {
                match pair.split_once(':') {
                    Some((key, value)) => update.set(key, value),
                    None => debug!("inputs: ignoring token '{}'", pair),
                }
            }
            return Ok(Self::Inputs(update));
        }

        if words.next().is_some() {
            return Err(MessageError::Unrecognised);
        }

        match first.parse::<i64>() {
            Ok(secs) if secs > 0 => u32::try_from(secs)
                .map(|secs| Self::ReportInterval { secs })
                .map_err(|_| MessageError::InvalidInterval),
            Ok(_) => Err(MessageError::InvalidInterval),
            Err(_) => Err(MessageError::Unrecognised),
        }
    }
}
