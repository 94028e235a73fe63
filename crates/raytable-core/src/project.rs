//! Forward projection of camera-frame points to distorted pixels.

use crate::models::{distort_to_pixel, CalibrationError, IntrinsicParameters};
use crate::{Pt3, Vec2};

/// Result of projecting one 3D point.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Distorted pixel coordinate. Meaningful only when `valid` is true;
    /// callers must treat it as a don't-care value otherwise.
    pub pixel: Vec2,
    /// False when the point lies behind the camera or outside the
    /// distortion model's validity radius.
    pub valid: bool,
}

/// Project a point in camera coordinates to a distorted pixel.
///
/// Points with `z <= 0` are behind the camera and yield an invalid result
/// rather than an error; per-point invalidity is data, a broken calibration
/// is not. The behind-camera gate runs before the configuration check.
///
/// # Errors
///
/// Returns [`CalibrationError`] when the calibration has a non-positive
/// focal scale.
pub fn project_point(
    calib: &IntrinsicParameters,
    point: &Pt3,
) -> Result<Projection, CalibrationError> {
    if point.z <= 0.0 {
        return Ok(Projection {
            pixel: Vec2::zeros(),
            valid: false,
        });
    }

    calib.validate()?;

    let xy = Vec2::new(point.x / point.z, point.y / point.z);
    Ok(match distort_to_pixel(calib, xy) {
        Some(eval) => Projection {
            pixel: eval.pixel,
            valid: true,
        },
        None => Projection {
            pixel: Vec2::zeros(),
            valid: false,
        },
    })
}
