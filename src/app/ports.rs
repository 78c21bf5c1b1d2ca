//! Port traits — the hexagonal boundary between the driver and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TrafficLightDriver (domain)
//! ```
//!
//! The hub's message bus, the monotonic clock and the ranging hardware are
//! all injected through these traits, so the driver's zone and reporting
//! logic runs on the host against test doubles.

use crate::error::{BusError, SensorError};

// ───────────────────────────────────────────────────────────────
// Message bus (driven adapter: domain → hub)
// ───────────────────────────────────────────────────────────────

/// Outbound side of the hub's string message bus.
///
/// Every message is a `topic` (device or channel name) followed by a
/// space and a `payload`.  Inbound messages are handed to
/// [`TrafficLightDriver::apply_message`](super::service::TrafficLightDriver::apply_message)
/// by whoever owns the transport.
pub trait MessageBus {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BusError>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait Clock {
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

// ───────────────────────────────────────────────────────────────
// Distance sensor (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One blocking distance measurement.
pub trait DistanceSensor {
    /// Distance to the nearest object in centimetres.
    ///
    /// Implementations must bound how long they block and report a
    /// missing or over-long echo as an error, never as a made-up distance.
    fn measure(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Pollable (driving adapter: scheduler → domain)
// ───────────────────────────────────────────────────────────────

/// Capability the [`PollingScheduler`](crate::scheduler::PollingScheduler)
/// drives.  Implementors choose their own cadence and may change it
/// between polls.
pub trait Pollable {
    /// Device name; inbound hub messages are routed on it.
    fn name(&self) -> &str;

    /// Milliseconds until the next poll should run.
    fn poll_interval_ms(&self) -> u32;

    /// Run one sensing cycle.
    fn tick(&mut self);

    /// Handle a hub message whose first word is [`name`](Self::name).
    fn handle_message(&mut self, raw: &str);
}
