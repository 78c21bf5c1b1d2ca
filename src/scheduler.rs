//! Polling executor.
//!
//! Owns a handful of [`Pollable`] devices and calls each one's `tick()`
//! at the device's own cadence.  The cadence is re-read after every poll,
//! so a device that changes its interval (the traffic light does on an
//! `inputs` message) is picked up on the next period.  A per-device
//! offset staggers the first poll so sensors sharing an interval do not
//! all range on the same pass.
//!
//! Inbound hub messages are routed here too, by their first word, which
//! keeps every device touched only from the loop that owns the scheduler.
//!
//! ```text
//!   main loop ──▶ run_pending(now) ──▶ Pollable::tick()
//!   bus line  ──▶ dispatch(raw)    ──▶ Pollable::handle_message()
//! ```

use heapless::Vec;
use log::{debug, info, warn};

use crate::app::ports::Pollable;

/// Maximum number of devices (stack-allocated).
pub const MAX_DEVICES: usize = 4;

struct Entry<'a> {
    device: &'a mut dyn Pollable,
    next_due_ms: u64,
}

/// The polling engine.
pub struct PollingScheduler<'a> {
    entries: Vec<Entry<'a>, MAX_DEVICES>,
}

impl Default for PollingScheduler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PollingScheduler<'a> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a device.  Its first poll is due `offset_ms` after `now_ms`.
    /// Returns the slot index, or `None` if full.
    pub fn add(&mut self, device: &'a mut dyn Pollable, offset_ms: u64, now_ms: u64) -> Option<usize> {
        if self.entries.is_full() {
            warn!("Scheduler: no free slot for '{}'", device.name());
            return None;
        }
        let slot = self.entries.len();
        info!(
            "Scheduler: added '{}' at slot {} (offset {} ms, every {} ms)",
            device.name(),
            slot,
            offset_ms,
            device.poll_interval_ms()
        );
        self.entries
            .push(Entry {
                device,
                next_due_ms: now_ms.saturating_add(offset_ms),
            })
            .ok()?;
        Some(slot)
    }

    /// Poll every device that is due.  Returns how many were polled.
    ///
    /// The next deadline is measured from `now_ms`, not from the missed
    /// deadline, so a long blocking poll does not cause a catch-up burst.
    pub fn run_pending(&mut self, now_ms: u64) -> usize {
        let mut fired = 0;
        for entry in self.entries.iter_mut() {
            if now_ms < entry.next_due_ms {
                continue;
            }
            entry.device.tick();
            let interval = u64::from(entry.device.poll_interval_ms().max(1));
            entry.next_due_ms = now_ms.saturating_add(interval);
            fired += 1;
        }
        fired
    }

    /// Route a hub message to the device named by its first word.
    /// Returns `false` if no such device is registered.
    pub fn dispatch(&mut self, raw: &str) -> bool {
        let Some(target) = raw.split_whitespace().next() else {
            debug!("Scheduler: ignoring blank message");
            return false;
        };
        match self.entries.iter_mut().find(|e| e.device.name() == target) {
            Some(entry) => {
                entry.device.handle_message(raw);
                true
            }
            None => {
                warn!("Scheduler: no device named '{}'", target);
                false
            }
        }
    }

    /// Earliest deadline across all devices, for sleeping between passes.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.next_due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
