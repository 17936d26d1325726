//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default ticks per second: one tick per millisecond.
pub const DEFAULT_TICK_RATE_HZ: u32 = 1000;

/// Build-time settings for converting stream tables into ticks.
///
/// # Example
///
/// ```rust
/// use steptable::core::EngineConfig;
///
/// let config = EngineConfig { tick_rate_hz: 100 };
/// assert_eq!(config.ms_to_ticks(250), 25);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rate at which the tick source advances.
    pub tick_rate_hz: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl EngineConfig {
    /// Convert milliseconds to ticks, truncating.
    pub fn ms_to_ticks(&self, ms: u32) -> u64 {
        u64::from(ms) * u64::from(self.tick_rate_hz) / 1000
    }
}
