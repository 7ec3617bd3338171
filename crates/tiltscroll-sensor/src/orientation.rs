use crate::types::{OrientationAngles, RawSample, ScreenRotation};
use glam::{Mat3, Quat, Vec3};
use thiserror::Error;

/// Sensors report a vector part that can overshoot unit length by rounding
/// noise. Anything past this is treated as a malformed sample.
const UNIT_TOLERANCE: f32 = 1e-3;

/// Smallest squared quaternion length accepted before normalizing.
const MIN_LENGTH_SQ: f32 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("Rotation vector has a non-finite component")]
    NonFinite,
    #[error("Rotation vector longer than unit length (|v|^2 = {0})")]
    VectorTooLong(f32),
    #[error("Rotation quaternion has zero length")]
    ZeroLength,
}

/// Converts rotation-vector samples into pitch/roll in the displayed screen's frame.
///
/// Stateless: all intermediate matrices live on the stack, so the same
/// estimator can be fed at any sensor rate without allocating.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrientationEstimator;

impl OrientationEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate (pitch, roll) in degrees for one sample.
    ///
    /// Malformed samples return an error; the caller is expected to skip them.
    pub fn estimate(
        &self,
        sample: &RawSample,
        rotation: ScreenRotation,
    ) -> Result<OrientationAngles, EstimateError> {
        let device = rotation_matrix(sample)?;
        let screen = remap_for_screen(device, rotation);
        let (_azimuth, pitch, roll) = euler_angles(&screen);
        Ok(OrientationAngles {
            pitch: pitch.to_degrees(),
            roll: roll.to_degrees(),
        })
    }
}

/// Build the device-to-world rotation matrix from a rotation-vector sample.
fn rotation_matrix(sample: &RawSample) -> Result<Mat3, EstimateError> {
    let v = sample.vector;
    if !v.is_finite() || sample.scalar.is_some_and(|w| !w.is_finite()) {
        return Err(EstimateError::NonFinite);
    }

    let w = match sample.scalar {
        Some(w) => w,
        None => {
            let len_sq = v.length_squared();
            if len_sq > 1.0 + UNIT_TOLERANCE {
                return Err(EstimateError::VectorTooLong(len_sq));
            }
            (1.0 - len_sq).max(0.0).sqrt()
        }
    };

    let q = Quat::from_xyzw(v.x, v.y, v.z, w);
    if q.length_squared() < MIN_LENGTH_SQ {
        return Err(EstimateError::ZeroLength);
    }
    Ok(Mat3::from_quat(q.normalize()))
}

/// Re-express the matrix's axes in the frame of the currently displayed screen.
fn remap_for_screen(m: Mat3, rotation: ScreenRotation) -> Mat3 {
    // (new X axis, new Y axis) in terms of the device axes.
    let (x_axis, y_axis) = match rotation {
        ScreenRotation::Rot0 => return m,
        ScreenRotation::Rot90 => (Vec3::Y, Vec3::NEG_X),
        ScreenRotation::Rot180 => (Vec3::NEG_X, Vec3::NEG_Y),
        ScreenRotation::Rot270 => (Vec3::NEG_Y, Vec3::X),
    };
    let z_axis = x_axis.cross(y_axis);
    let permutation = Mat3::from_cols(x_axis, y_axis, z_axis).transpose();
    m * permutation
}

/// Extract (azimuth, pitch, roll) in radians from a row-major rotation matrix view.
fn euler_angles(m: &Mat3) -> (f32, f32, f32) {
    let r0 = m.row(0);
    let r1 = m.row(1);
    let r2 = m.row(2);
    let azimuth = r0.y.atan2(r1.y);
    // Rounding can push the element just past ±1.
    let pitch = (-r2.y).clamp(-1.0, 1.0).asin();
    let roll = (-r2.x).atan2(r2.z);
    (azimuth, pitch, roll)
}
