//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs HIGH on the trigger pin fires an 8-cycle 40 kHz burst; the echo
//! pin then goes HIGH for the round-trip time of the ping.  Distance is
//! `pulse_us * 0.034 / 2` centimetres (sound at ~340 m/s, halved for the
//! round trip).
//!
//! ## Bounded wait
//!
//! Both edges of the echo pulse are awaited against the injected
//! [`Clock`] with a timeout.  No rising edge is [`SensorError::NoEcho`]
//! (sensor unplugged or dead); a pulse that outlasts the timeout is
//! [`SensorError::EchoTimeout`] (nothing in range).
//!
//! The sensor keeps echo high for ~38 ms when nothing answers, longer
//! than the default timeout, so the tail of a timed-out ping can still be
//! on the line when the next one is due.  Each ping first waits for echo
//! to be low, otherwise that tail would be timed as a short pulse.
//! Echo that never drops is [`SensorError::EchoStuck`].
//!
//! Generic over `embedded-hal` 1.0 pins and delay, so the same code runs
//! on ESP-IDF `PinDriver`s and on host-side test doubles.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{Clock, DistanceSensor};
use crate::error::SensorError;

/// Centimetres per microsecond of sound travel.
const SOUND_CM_PER_US: f32 = 0.034;

/// Convert an echo pulse width to a one-way distance.
pub fn pulse_to_cm(pulse_us: u32) -> f32 {
    pulse_us as f32 * SOUND_CM_PER_US / 2.0
}

pub struct HcSr04<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u32,
}

impl<T, E, D, C> HcSr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: Clock,
{
    /// Take ownership of the pins and park the trigger LOW.
    pub fn new(mut trigger: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Result<Self, SensorError> {
        trigger.set_low().map_err(|_| SensorError::Gpio)?;
        Ok(Self {
            trigger,
            echo,
            delay,
            clock,
            timeout_us,
        })
    }

    /// Fire one ping and return the echo pulse width in microseconds.
    pub fn measure_pulse_us(&mut self) -> Result<u32, SensorError> {
        self.wait_for_level(false, SensorError::EchoStuck)?;

        self.trigger.set_low().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(10);
        self.trigger.set_low().map_err(|_| SensorError::Gpio)?;

        let rise = self.wait_for_level(true, SensorError::NoEcho)?;
        let fall = self.wait_for_level(false, SensorError::EchoTimeout)?;
        Ok(fall.saturating_sub(rise).min(u64::from(u32::MAX)) as u32)
    }

    /// Busy-wait until echo reads `high`, returning the timestamp it did.
    fn wait_for_level(&mut self, high: bool, on_timeout: SensorError) -> Result<u64, SensorError> {
        let started = self.clock.now_us();
        loop {
            let now = self.clock.now_us();
            if self.echo.is_high().map_err(|_| SensorError::Gpio)? == high {
                return Ok(now);
            }
            if now.saturating_sub(started) > u64::from(self.timeout_us) {
                return Err(on_timeout);
            }
        }
    }

    /// Release the pins, e.g. to hand them to another driver.
    pub fn release(self) -> (T, E) {
        (self.trigger, self.echo)
    }
}

impl<T, E, D, C> DistanceSensor for HcSr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: Clock,
{
    fn measure(&mut self) -> Result<f32, SensorError> {
        self.measure_pulse_us().map(pulse_to_cm)
    }
}
