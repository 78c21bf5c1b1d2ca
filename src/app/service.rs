//! Traffic-light driver — the hexagonal core.
//!
//! [`TrafficLightDriver`] owns the per-sensor state and the injected
//! ports.  Each tick it ranges once, drives the indicator for the zone the
//! reading falls in, and reports the distance upstream no more often than
//! the hub asked for.
//!
//! ```text
//!  DistanceSensor ──▶ ┌──────────────────────────┐ ──▶ MessageBus
//!                     │    TrafficLightDriver     │     (indicator, reports)
//!           Clock ──▶ │ classify · blink · throttle│
//!                     └──────────────────────────┘ ◀── apply_message()
//! ```

use log::{debug, info, warn};

use crate::config::DriverConfig;
use crate::error::{MessageError, Result, SensorError};

use super::commands::{InboundMessage, SettingsUpdate};
use super::events::OutboundMessage;
use super::ports::{Clock, DistanceSensor, MessageBus, Pollable};
use super::zone::{IndicatorColour, Thresholds, Zone};

// ───────────────────────────────────────────────────────────────
// TrafficLightDriver
// ───────────────────────────────────────────────────────────────

/// State for one ranger/indicator pairing.
pub struct TrafficLightDriver<S, B, C> {
    config: DriverConfig,
    sensor: S,
    bus: B,
    clock: C,
    thresholds: Thresholds,
    local_poll_ms: u32,
    report_interval_ms: u64,
    /// `None` until the first report, so the first good reading goes out at once.
    last_report_ms: Option<u64>,
    last_distance: Option<f32>,
    last_zone: Option<Zone>,
    /// Too-far blink phase; not reset when leaving the zone.
    blink_on: bool,
    consecutive_failures: u32,
}

impl<S, B, C> TrafficLightDriver<S, B, C>
where
    S: DistanceSensor,
    B: MessageBus,
    C: Clock,
{
    /// Build the driver and ask the hub for its current settings.
    ///
    /// The sensor arrives with its pins already configured (trigger as
    /// output, echo as input).  A failed settings request is logged; the
    /// driver then runs on its boot thresholds until the hub pushes some.
    pub fn new(config: DriverConfig, sensor: S, bus: B, clock: C) -> Result<Self> {
        config.validate()?;

        let mut driver = Self {
            thresholds: config.thresholds,
            local_poll_ms: config.local_poll_ms,
            report_interval_ms: config.report_interval_ms(),
            config,
            sensor,
            bus,
            clock,
            last_report_ms: None,
            last_distance: None,
            last_zone: None,
            blink_on: false,
            consecutive_failures: 0,
        };
        driver.request_settings();
        info!(
            "{}: ready (trigger={} echo={} indicator={})",
            driver.config.device_name,
            driver.config.trigger_pin,
            driver.config.echo_pin,
            driver.config.indicator_channel
        );
        Ok(driver)
    }

    // ── Inbound configuration ─────────────────────────────────

    /// Apply a hub message addressed to this device.
    ///
    /// Malformed or unknown content never panics and never touches the
    /// indicator; the error is logged and returned for callers that care.
    pub fn apply_message(&mut self, raw: &str) -> core::result::Result<(), MessageError> {
        let outcome = match InboundMessage::parse(raw) {
            Ok(InboundMessage::Inputs(update)) => self.apply_settings(&update),
            Ok(InboundMessage::ReportInterval { secs }) => {
                self.report_interval_ms = u64::from(secs) * 1000;
                info!(
                    "{}: report interval set to {} s",
                    self.config.device_name, secs
                );
                Ok(())
            }
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!("{}: message '{}' not applied: {}", self.config.device_name, raw, e);
        }
        outcome
    }

    /// Thresholds change all-or-nothing; `local_poll` applies regardless.
    fn apply_settings(&mut self, update: &SettingsUpdate) -> core::result::Result<(), MessageError> {
        let mut outcome = Ok(());

        if update.touches_thresholds() {
            let merged = update.merge_into(self.thresholds);
            if merged.is_ascending() {
                self.thresholds = merged;
                info!(
                    "{}: thresholds too_far={} stop={} warning={} proceed={}",
                    self.config.device_name, merged.too_far, merged.stop, merged.warning, merged.proceed
                );
            } else {
                outcome = Err(MessageError::ThresholdOrder);
            }
        }

        if let Some(ms) = update.local_poll_ms {
            self.local_poll_ms = ms;
        }
        info!("{}: polling every {} ms", self.config.device_name, self.local_poll_ms);

        outcome
    }

    /// Publish `<device> get_inputs`.
    pub fn request_settings(&mut self) {
        let msg = OutboundMessage::ConfigRequest { device: &self.config.device_name };
        if let Err(e) = msg.publish(&mut self.bus) {
            warn!("{}: settings request failed: {}", self.config.device_name, e);
        }
    }

    // ── Per-tick cycle ────────────────────────────────────────

    /// Range once, drive the indicator, and report if the interval elapsed.
    ///
    /// A failed reading does nothing else: the previous distance is kept and
    /// neither the light nor the hub hears about it, so a lost echo cannot
    /// flip the zone.
    pub fn tick(&mut self) -> core::result::Result<Zone, SensorError> {
        let distance = match self.sensor.measure() {
            Ok(d) => d,
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    "{}: no reading ({}), {} in a row",
                    self.config.device_name, e, self.consecutive_failures
                );
                return Err(e);
            }
        };

        self.consecutive_failures = 0;
        self.last_distance = Some(distance);
        debug!("{}: sensor value {:.2} cm", self.config.device_name, distance);

        let zone = self.classify_and_drive(distance);
        self.report_if_due(distance);
        Ok(zone)
    }

    /// Issue exactly one indicator command for `distance`.
    fn classify_and_drive(&mut self, distance: f32) -> Zone {
        let zone = self.thresholds.classify(distance);
        let colour = match zone {
            Zone::TooFar => {
                let colour = if self.blink_on { IndicatorColour::Off } else { IndicatorColour::Red };
                self.blink_on = !self.blink_on;
                colour
            }
            Zone::Stop => IndicatorColour::Red,
            Zone::Warning => IndicatorColour::Yellow,
            Zone::Proceed => IndicatorColour::Green,
            Zone::Waiting => IndicatorColour::Off,
        };

        if self.last_zone != Some(zone) {
            info!("{}: {:.1} cm -> {}", self.config.device_name, distance, zone);
            self.last_zone = Some(zone);
        }

        let msg = OutboundMessage::Indicator {
            channel: &self.config.indicator_channel,
            colour,
        };
        if let Err(e) = msg.publish(&mut self.bus) {
            warn!("{}: indicator command failed: {}", self.config.device_name, e);
        }
        zone
    }

    /// A failed publish leaves the timestamp alone so the next tick retries.
    fn report_if_due(&mut self, distance: f32) {
        let now = self.clock.now_ms();
        let due = self
            .last_report_ms
            .is_none_or(|last| now.saturating_sub(last) >= self.report_interval_ms);
        if !due {
            return;
        }

        let msg = OutboundMessage::StatusReport {
            device: &self.config.device_name,
            distance_cm: distance,
        };
        match msg.publish(&mut self.bus) {
            Ok(()) => self.last_report_ms = Some(now),
            Err(e) => warn!("{}: status report failed: {}", self.config.device_name, e),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Most recent good reading in centimetres.
    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    pub fn local_poll_ms(&self) -> u32 {
        self.local_poll_ms
    }

    pub fn report_interval_ms(&self) -> u64 {
        self.report_interval_ms
    }

    /// Ticks in a row that produced no reading.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

impl<S, B, C> Pollable for TrafficLightDriver<S, B, C>
where
    S: DistanceSensor,
    B: MessageBus,
    C: Clock,
{
    fn name(&self) -> &str {
        &self.config.device_name
    }

    fn poll_interval_ms(&self) -> u32 {
        self.local_poll_ms
    }

    fn tick(&mut self) {
        // Failures are already logged and counted by the inherent tick.
        let _ = TrafficLightDriver::tick(self);
    }

    fn handle_message(&mut self, raw: &str) {
        let _ = self.apply_message(raw);
    }
}
