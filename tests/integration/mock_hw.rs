//! Mock adapters for integration tests.
//!
//! Records every bus message so tests can assert on the full outbound
//! history, and simulates the HC-SR04 pins against a shared microsecond
//! timeline without touching real GPIO.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use trafficlight::app::ports::{Clock, DistanceSensor, MessageBus};
use trafficlight::error::{BusError, SensorError};

// ── MockBus ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockBus {
    pub sent: Vec<(String, String)>,
    /// When set, every publish fails with this error.
    pub fail_with: Option<BusError>,
}

#[allow(dead_code)]
impl MockBus {
    /// Payloads published on `topic`, oldest first.
    pub fn payloads(&self, topic: &str) -> Vec<String> {
        self.sent
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn last_payload(&self, topic: &str) -> Option<String> {
        self.payloads(topic).pop()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl MessageBus for MockBus {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BusError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.sent.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Manually advanced clock.  Clones share the same time.
#[derive(Clone, Default)]
pub struct MockClock {
    now_us: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1000);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

// ── MockSensor ────────────────────────────────────────────────

/// Returns whatever the test last put in `next`.
pub struct MockSensor {
    pub next: Result<f32, SensorError>,
    pub reads: u32,
}

impl MockSensor {
    pub fn reading(cm: f32) -> Self {
        Self { next: Ok(cm), reads: 0 }
    }
}

impl DistanceSensor for MockSensor {
    fn measure(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.next
    }
}

// ── Simulated HC-SR04 pins ────────────────────────────────────

/// Shared microsecond timeline.  Every `now_us()` read advances it by
/// 1 µs so busy-wait loops make progress.
#[derive(Clone, Default)]
pub struct SimClock {
    pub now_us: Rc<Cell<u64>>,
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        let t = self.now_us.get();
        self.now_us.set(t + 1);
        t
    }
}

/// Delay that just moves the timeline forward.
pub struct SimDelay {
    pub now_us: Rc<Cell<u64>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now_us.set(self.now_us.get() + u64::from(ns.div_ceil(1000)));
    }
}

/// Trigger pin that records each level written.
#[derive(Clone, Default)]
pub struct SimTrigger {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

/// Trigger pin whose writes always fail.
pub struct BrokenTrigger;

impl ErrorType for BrokenTrigger {
    type Error = ErrorKind;
}

impl OutputPin for BrokenTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Echo pin that is HIGH from `rise_at` until `fall_at` on the timeline.
pub struct SimEcho {
    pub now_us: Rc<Cell<u64>>,
    /// `None` = the echo never rises (sensor disconnected).
    pub rise_at: Option<u64>,
    pub fall_at: u64,
}

impl ErrorType for SimEcho {
    type Error = Infallible;
}

impl InputPin for SimEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let t = self.now_us.get();
        Ok(self.rise_at.is_some_and(|rise| t >= rise && t < self.fall_at))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Pieces of one simulated ranger sharing a timeline.
pub struct SimRanger {
    pub clock: SimClock,
    pub delay: SimDelay,
    pub trigger: SimTrigger,
    pub echo: SimEcho,
}

/// Echo rises `rise_after_us` into the timeline and stays up `pulse_us`.
#[allow(dead_code)]
pub fn sim_ranger(rise_after_us: Option<u64>, pulse_us: u64) -> SimRanger {
    let clock = SimClock::default();
    let now_us = clock.now_us.clone();
    SimRanger {
        delay: SimDelay { now_us: now_us.clone() },
        trigger: SimTrigger::default(),
        echo: SimEcho {
            now_us,
            rise_at: rise_after_us,
            fall_at: rise_after_us.unwrap_or(0) + pulse_us,
        },
        clock,
    }
}
