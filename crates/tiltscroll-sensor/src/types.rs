use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Raw reading from a rotation-vector sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Vector part of the rotation quaternion (unitless, x/y/z).
    pub vector: Vec3,
    /// Scalar part of the quaternion, when the sensor reports it.
    /// Derived from the vector part otherwise.
    pub scalar: Option<f32>,
    /// Monotonic sensor timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

impl RawSample {
    pub fn new(vector: Vec3, timestamp_ns: u64) -> Self {
        Self {
            vector,
            scalar: None,
            timestamp_ns,
        }
    }

    pub fn with_scalar(mut self, scalar: f32) -> Self {
        self.scalar = Some(scalar);
        self
    }
}

/// Rotation of the displayed screen relative to the device's natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenRotation {
    #[default]
    #[serde(rename = "0")]
    Rot0,
    #[serde(rename = "90")]
    Rot90,
    #[serde(rename = "180")]
    Rot180,
    #[serde(rename = "270")]
    Rot270,
}

impl ScreenRotation {
    /// Map a rotation in degrees (0, 90, 180, 270) to a variant.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Rot0),
            90 => Some(Self::Rot90),
            180 => Some(Self::Rot180),
            270 => Some(Self::Rot270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Rot0 => 0,
            Self::Rot90 => 90,
            Self::Rot180 => 180,
            Self::Rot270 => 270,
        }
    }
}

/// Device tilt in the displayed screen's frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationAngles {
    /// Rotation around the screen's lateral axis (nose up/down).
    pub pitch: f32,
    /// Rotation around the screen's longitudinal axis (side to side).
    pub roll: f32,
}

impl OrientationAngles {
    pub fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_degrees_match_variants() {
        for degrees in [0, 90, 180, 270] {
            let rotation = ScreenRotation::from_degrees(degrees).unwrap();
            assert_eq!(rotation.degrees(), degrees);
        }
        assert_eq!(ScreenRotation::from_degrees(45), None);
    }
}
