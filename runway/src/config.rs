//! Controller tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning knobs for [`Viewport`](crate::Viewport).
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollerConfig {
    /// Items to instantiate beyond the viewport in the scroll direction.
    pub runway_items: usize,
    /// Items to instantiate beyond the viewport against the scroll direction.
    pub runway_items_opposite: usize,
    /// Extra scrollable pixels past the last positioned item.
    pub scroll_runway: f32,
    /// Length of the placeholder-to-content morph; `0` swaps instantly.
    pub animation_duration_ms: u64,
    /// Most hidden placeholders kept around for reuse.
    pub placeholder_pool_capacity: usize,
    /// Frame interval used by the tokio scheduler.
    pub frame_interval_ms: u64,
}

impl ScrollerConfig {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn animates(&self) -> bool {
        self.animation_duration_ms > 0
    }
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            runway_items: 5,
            runway_items_opposite: 5,
            scroll_runway: 1000.0,
            animation_duration_ms: 200,
            placeholder_pool_capacity: 64,
            frame_interval_ms: 16,
        }
    }
}
