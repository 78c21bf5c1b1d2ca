//! Unified error types for the traffic-light firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! driver's per-tick and per-message paths handle failures the same way.
//! All variants are `Copy`; none of them is fatal to the host.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The ultrasonic ranger produced no usable reading.
    Sensor(SensorError),
    /// An inbound bus message was rejected.
    Message(MessageError),
    /// An outbound bus message could not be delivered.
    Bus(BusError),
    /// Construction-time configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Message(e) => write!(f, "message: {e}"),
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The echo line never went high after the trigger pulse.
    NoEcho,
    /// The echo pulse lasted longer than the configured timeout.
    EchoTimeout,
    /// The echo line was still high from an earlier ping when this one
    /// was due, and did not drop within the timeout.
    EchoStuck,
    /// Driving the trigger or sampling the echo pin failed.
    Gpio,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEcho => write!(f, "no echo received"),
            Self::EchoTimeout => write!(f, "echo pulse timed out"),
            Self::EchoStuck => write!(f, "echo still high from a previous ping"),
            Self::Gpio => write!(f, "GPIO access failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Inbound message errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// Nothing followed the device name.
    Empty,
    /// Neither an `inputs` update nor a bare integer.
    Unrecognised,
    /// The report interval was zero or did not fit.
    InvalidInterval,
    /// The merged thresholds would not be in ascending order.
    ThresholdOrder,
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty message"),
            Self::Unrecognised => write!(f, "unrecognised message"),
            Self::InvalidInterval => write!(f, "invalid report interval"),
            Self::ThresholdOrder => write!(f, "thresholds out of order"),
        }
    }
}

impl From<MessageError> for Error {
    fn from(e: MessageError) -> Self {
        Self::Message(e)
    }
}

// ---------------------------------------------------------------------------
// Message bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The outbound queue has no room left.
    Full,
    /// The transport to the hub is down.
    Disconnected,
    /// Topic plus payload do not fit the outbound frame.
    TooLong,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "outbound queue full"),
            Self::Disconnected => write!(f, "bus disconnected"),
            Self::TooLong => write!(f, "message too long"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
