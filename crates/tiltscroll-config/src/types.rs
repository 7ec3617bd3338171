use serde::{Deserialize, Serialize};
use tiltscroll_sensor::ScreenRotation;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tilt-to-offset mapping and scroll animation.
    pub layout: LayoutConfig,
    /// Sensor feed and animation pacing.
    pub feed: FeedConfig,
}

/// Scroll direction relative to the device tilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Content slides the way the device leans, like a weight rolling downhill.
    #[default]
    Normal,
    /// Content slides against the lean, giving a depth parallax.
    Reverse,
}

impl Direction {
    /// Signed multiplier: +1 for `Normal`, -1 for `Reverse`.
    pub fn factor(self) -> f32 {
        match self {
            Direction::Normal => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Largest horizontal content offset in pixels. Negative values mirror the offset.
    pub max_horizontal_offset_px: i32,
    /// Largest vertical content offset in pixels. Negative values mirror the offset.
    pub max_vertical_offset_px: i32,
    /// Duration of the eased scroll toward each new target. 0 jumps immediately.
    pub scroll_duration_ms: u32,
    /// Tilt angle at which the offset saturates. Typical range 30-60.
    pub threshold_degrees: f32,
    pub direction: Direction,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_horizontal_offset_px: 150,
            max_vertical_offset_px: 130,
            scroll_duration_ms: 0,
            threshold_degrees: 45.0,
            direction: Direction::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Sensor delivery rate.
    pub sample_rate_hz: u32,
    /// Animation tick rate.
    pub tick_rate_hz: u32,
    /// Screen rotation the samples are interpreted in.
    pub screen_rotation: ScreenRotation,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100,
            tick_rate_hz: 60,
            screen_rotation: ScreenRotation::Rot0,
        }
    }
}
