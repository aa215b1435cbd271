// Strong typing over raw numbers. Newtype for timestamps, plain structs for layout reads.
// See DESIGN.md: Data model

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    /// Converts a millisecond reading (e.g. `performance.now()`) to a timestamp.
    /// Negative and non-finite readings clamp to zero.
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Timestamp((ms * 1000.0).round() as u64)
        } else {
            Timestamp(0)
        }
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Microseconds elapsed since `earlier`. Zero if the clock went backwards.
    pub fn micros_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn saturating_add_micros(&self, us: u64) -> Self {
        Timestamp(self.0.saturating_add(us))
    }
}

/// Portion (0.0 to 1.0) of an element's extent along one axis that intersects the viewport.
pub type OverlapFraction = f64;

/// Layout rectangle of the target in viewport-relative CSS pixels.
/// Read fresh on every tick, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Rect {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Builds a rect from an origin and a size, as layout APIs commonly report.
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            top,
            bottom: top + height,
            left,
            right: left + width,
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Current visible window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        ViewportSize { width, height }
    }
}

/// Page visibility as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    Visible,
    Hidden,
}

impl VisibilityState {
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden {
            VisibilityState::Hidden
        } else {
            VisibilityState::Visible
        }
    }
}

/// Probe configuration passed from JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Minimum visible percentage (0-100, inclusive) for the element to count as viewable.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Suppress the default action (e.g. navigation) of clicks on the target.
    #[serde(default = "default_true")]
    pub suppress_click_default: bool,
}

fn default_threshold() -> f64 {
    100.0
}

fn default_true() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            threshold: default_threshold(),
            suppress_click_default: true,
        }
    }
}

impl ProbeConfig {
    pub fn with_threshold(threshold: f64) -> Self {
        ProbeConfig {
            threshold,
            ..Default::default()
        }
    }

    pub fn from_json(config_json: &str) -> Result<Self, ProbeError> {
        let config: ProbeConfig = serde_json::from_str(config_json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(ProbeError::InvalidConfig(format!(
                "threshold must be within 0..=100, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Side-effect-free view of the metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewabilitySnapshot {
    pub is_viewable: bool,
    pub percent_viewable: f64,
    /// Accumulated viewable time, including the interval still in progress.
    pub viewable_time_seconds: f64,
    pub click_count: u64,
}
