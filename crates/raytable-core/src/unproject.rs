//! Iterative unprojection of distorted pixels to rays.
//!
//! Inverts the forward map with an analytic initial guess refined by a
//! damped Newton-Raphson loop on the pixel residual, using the distortion
//! model's closed-form Jacobian.

use crate::models::{
    distort_to_pixel, undistort_pixel_approx, CalibrationError, IntrinsicParameters,
};
use crate::{Real, Vec2, Vec3};

/// Newton pass cap; together with the non-improvement termination this
/// bounds the iteration.
const MAX_PASSES: usize = 20;
/// Squared pixel error below which iteration stops early.
const CONVERGENCE_EPS: Real = 1e-22;
/// Squared pixel error up to which the refined estimate counts as valid.
const ACCEPT_EPS: Real = 1e-6;

/// Normalized-plane solution for one pixel.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedRay {
    /// Normalized coordinate (x/z, y/z) of the ray through the pixel.
    /// Always the best estimate found, even when `valid` is false.
    pub xy: Vec2,
    /// True when the refinement converged below the acceptance tolerance.
    pub valid: bool,
}

/// Unprojection scaled to a caller-chosen depth.
#[derive(Debug, Clone, Copy)]
pub struct UnprojectedPoint {
    /// Camera-frame point at the requested depth.
    pub point: Vec3,
    /// False for zero depth or an unconverged solve.
    pub valid: bool,
}

/// Solve for the normalized coordinate whose forward projection lands on
/// `pixel`.
///
/// Seeds with the closed-form approximate inverse, then refines with up to
/// 20 Newton passes. An estimate that walks out of the model's validity
/// domain terminates the solve immediately with `valid = false`; a pass
/// that fails to improve the pixel residual reverts to the best estimate
/// seen and stops.
///
/// # Errors
///
/// Returns [`CalibrationError`] when the calibration has a non-positive
/// focal scale.
pub fn unproject_normalized(
    calib: &IntrinsicParameters,
    pixel: Vec2,
) -> Result<NormalizedRay, CalibrationError> {
    calib.validate()?;

    let mut xy = undistort_pixel_approx(calib, pixel);
    let mut best_xy = Vec2::zeros();
    let mut best_err = Real::MAX;

    for pass in 0..MAX_PASSES {
        let Some(eval) = distort_to_pixel(calib, xy) else {
            // Left the validity domain; keep the current estimate.
            return Ok(NormalizedRay { xy, valid: false });
        };

        let residual = pixel - eval.pixel;
        let err = residual.norm_squared();
        if err >= best_err {
            xy = best_xy;
            break;
        }

        best_err = err;
        best_xy = xy;
        if pass + 1 == MAX_PASSES || best_err < CONVERGENCE_EPS {
            break;
        }

        // A singular Jacobian stops the refinement at the best estimate;
        // the acceptance threshold below still decides validity.
        let Some(jinv) = eval.jacobian.try_inverse() else {
            break;
        };
        xy += jinv * residual;
    }

    Ok(NormalizedRay {
        xy,
        valid: best_err <= ACCEPT_EPS,
    })
}

/// Unproject a distorted pixel to a camera-frame point at `depth`.
///
/// Zero depth yields the origin marked invalid without running the solver.
///
/// # Errors
///
/// Returns [`CalibrationError`] when the calibration has a non-positive
/// focal scale.
pub fn unproject_point(
    calib: &IntrinsicParameters,
    pixel: Vec2,
    depth: Real,
) -> Result<UnprojectedPoint, CalibrationError> {
    if depth == 0.0 {
        return Ok(UnprojectedPoint {
            point: Vec3::zeros(),
            valid: false,
        });
    }

    let ray = unproject_normalized(calib, pixel)?;
    Ok(UnprojectedPoint {
        point: Vec3::new(ray.xy.x * depth, ray.xy.y * depth, depth),
        valid: ray.valid,
    })
}
