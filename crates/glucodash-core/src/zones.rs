//! Glucose zone classification.
//!
//! Bands are half-open with ties routed to the lower band: a reading of
//! exactly 70 is Normal, exactly 180 is Elevated, exactly 250 is High.
//!
//! # Example
//!
//! ```
//! use glucodash_core::{Zone, Zones};
//!
//! let zones = Zones::default();
//! assert_eq!(zones.evaluate(65), Zone::Low);
//! assert_eq!(zones.evaluate(120), Zone::Normal);
//! ```

use serde::{Deserialize, Serialize};

/// Glucose zone for a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    /// Below the low threshold; needs attention.
    Low,
    /// Within the target band.
    Normal,
    /// Above target but below the high threshold.
    Elevated,
    /// At or above the high threshold.
    High,
}

impl Zone {
    /// Display label for the zone badge.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Zone::Low => "Low",
            Zone::Normal => "Normal",
            Zone::Elevated => "Elevated",
            Zone::High => "High",
        }
    }

    /// Whether this zone warrants an alert-style presentation.
    #[must_use]
    pub fn is_alert(&self) -> bool {
        matches!(self, Zone::Low | Zone::High)
    }
}

/// Configuration for zone boundaries, in mg/dL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Readings below this are Low.
    pub low_below: u16,
    /// Readings below this (and not Low) are Normal.
    pub elevated_from: u16,
    /// Readings at or above this are High.
    pub high_from: u16,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            low_below: 70,
            elevated_from: 180,
            high_from: 250,
        }
    }
}

impl ZoneConfig {
    /// Tighter boundaries for users targeting a narrower band.
    #[must_use]
    pub fn tight() -> Self {
        Self {
            low_below: 70,
            elevated_from: 140,
            high_from: 200,
        }
    }
}

/// Zone evaluator for glucose readings.
#[derive(Debug, Clone, Default)]
pub struct Zones {
    config: ZoneConfig,
}

impl Zones {
    /// Create an evaluator with the given configuration.
    #[must_use]
    pub fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    /// Create an evaluator with the tighter preset.
    #[must_use]
    pub fn tight() -> Self {
        Self::new(ZoneConfig::tight())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// Classify a reading in mg/dL.
    #[must_use]
    pub fn evaluate(&self, mgdl: u16) -> Zone {
        if mgdl < self.config.low_below {
            Zone::Low
        } else if mgdl < self.config.elevated_from {
            Zone::Normal
        } else if mgdl < self.config.high_from {
            Zone::Elevated
        } else {
            Zone::High
        }
    }
}
