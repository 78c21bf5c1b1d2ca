//! Distance zones and the indicator colour each one shows.
//!
//! ```text
//!  0 ──── too_far ──── stop ──── warning ──── proceed ──── ∞
//!  │ TooFar │   Stop   │ Warning │  Proceed   │  Waiting
//!  blink red   red       yellow     green        off
//! ```
//!
//! "Too far" is named from the driver's point of view: the car has pulled
//! past the stop mark and is too far in. Each bound is inclusive on the
//! near side, so a reading exactly on a threshold belongs to the closer
//! zone.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the five mutually exclusive distance ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    TooFar,
    Stop,
    Warning,
    Proceed,
    Waiting,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFar => write!(f, "too far"),
            Self::Stop => write!(f, "stop"),
            Self::Warning => write!(f, "warning"),
            Self::Proceed => write!(f, "proceed"),
            Self::Waiting => write!(f, "waiting"),
        }
    }
}

/// Colours the indicator device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColour {
    Red,
    Yellow,
    Green,
    Off,
}

impl IndicatorColour {
    /// Six-digit hex payload sent to the indicator channel.
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "ff0000",
            Self::Yellow => "ffff00",
            Self::Green => "00ff00",
            Self::Off => "000000",
        }
    }
}

/// Zone boundaries in whole centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub too_far: u16,
    pub stop: u16,
    pub warning: u16,
    pub proceed: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            too_far: 5,
            stop: 10,
            warning: 15,
            proceed: 20,
        }
    }
}

impl Thresholds {
    /// `too_far <= stop <= warning <= proceed`.
    ///
    /// Equal neighbours are allowed; they only make the farther zone empty.
    pub fn is_ascending(&self) -> bool {
        self.too_far <= self.stop && self.stop <= self.warning && self.warning <= self.proceed
    }

    /// Map a distance onto its zone.
    ///
    /// Total over `f32`: checks run in the fixed order too-far, stop,
    /// warning, proceed and the first match wins. Anything that matches
    /// none of them, NaN included, is `Waiting`.
    pub fn classify(&self, distance_cm: f32) -> Zone {
        if distance_cm <= f32::from(self.too_far) {
            Zone::TooFar
        } else if distance_cm <= f32::from(self.stop) {
            Zone::Stop
        } else if distance_cm <= f32::from(self.warning) {
            Zone::Warning
        } else if distance_cm <= f32::from(self.proceed) {
            Zone::Proceed
        } else {
            Zone::Waiting
        }
    }
}
