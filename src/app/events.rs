//! Outbound messages to the hub.
//!
//! Each message is rendered as a topic plus a short payload and handed to
//! the [`MessageBus`] port.  Payloads are formatted into fixed-capacity
//! buffers so the per-tick path never allocates.

use core::fmt::{self, Write};

use heapless::String;

use super::ports::MessageBus;
use super::zone::IndicatorColour;
use crate::error::BusError;

/// Capacity of a rendered payload.
pub const PAYLOAD_CAP: usize = 16;

/// Messages the driver sends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutboundMessage<'a> {
    /// Ask the hub to push the current `inputs` settings.
    ConfigRequest { device: &'a str },
    /// Latest distance reading for the hub's tile.
    StatusReport { device: &'a str, distance_cm: f32 },
    /// Colour for the indicator device.
    Indicator { channel: &'a str, colour: IndicatorColour },
}

impl OutboundMessage<'_> {
    pub fn topic(&self) -> &str {
        match self {
            Self::ConfigRequest { device } | Self::StatusReport { device, .. } => device,
            Self::Indicator { channel, .. } => channel,
        }
    }

    pub fn payload(&self) -> Result<String<PAYLOAD_CAP>, BusError> {
        let mut buf = String::new();
        let written = match self {
            Self::ConfigRequest { .. } => buf.write_str("get_inputs"),
            Self::StatusReport { distance_cm, .. } => write!(buf, "{:.2}", distance_cm),
            Self::Indicator { colour, .. } => buf.write_str(colour.hex()),
        };
        written.map_err(|_| BusError::TooLong)?;
        Ok(buf)
    }

    pub fn publish(&self, bus: &mut impl MessageBus) -> Result<(), BusError> {
        let payload = self.payload()?;
        bus.publish(self.topic(), &payload)
    }
}

impl fmt::Display for OutboundMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Ok(payload) => write!(f, "{} {}", self.topic(), payload),
            Err(_) => write!(f, "{} <unrenderable>", self.topic()),
        }
    }
}
