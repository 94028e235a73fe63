//! Brown-Conrady rational distortion map and its analytic Jacobian.
//!
//! The forward map takes a normalized coordinate (x/z, y/z), applies the
//! rational radial term a/b plus the tangential correction, and scales into
//! pixels. The 2×2 Jacobian comes from the same polynomial in closed form,
//! which is what keeps the Newton inversion in [`crate::unproject`] cheap.

use super::IntrinsicParameters;
use crate::{Mat2, Real, Vec2};

/// Maximum normalized radius accepted by the forward map.
///
/// 1.7 corresponds to roughly a 120 degree field of view. The
/// `metric_radius` declared on [`IntrinsicParameters`] is carried with the
/// calibration but intentionally not consulted here.
pub const MAX_PROJECTION_RADIUS: Real = 1.7;

/// Forward distortion evaluated at one normalized coordinate.
#[derive(Debug, Clone, Copy)]
pub struct DistortionEval {
    /// Distorted pixel coordinate.
    pub pixel: Vec2,
    /// Partials of the pixel with respect to the normalized input,
    /// rows (du/dx, du/dy) and (dv/dx, dv/dy).
    pub jacobian: Mat2,
}

/// Numerator and denominator of the rational radial term at squared
/// radius `rs`.
fn radial_terms(k: &[Real; 6], rs: Real) -> (Real, Real) {
    let rss = rs * rs;
    let rsc = rss * rs;
    let a = 1.0 + k[0] * rs + k[1] * rss + k[2] * rsc;
    let b = 1.0 + k[3] * rs + k[4] * rss + k[5] * rsc;
    (a, b)
}

/// Reciprocal with the zero-divisor fallback shared by the forward map and
/// the closed-form inverse: a vanishing denominator substitutes a unit
/// divisor instead of failing.
fn guarded_recip(den: Real) -> Real {
    if den != 0.0 {
        1.0 / den
    } else {
        1.0
    }
}

/// Evaluate the forward Brown-Conrady map at the normalized coordinate `xy`.
///
/// Returns `None` when `xy` lies outside the validity radius; neither a
/// pixel nor a Jacobian is produced in that case.
pub fn distort_to_pixel(calib: &IntrinsicParameters, xy: Vec2) -> Option<DistortionEval> {
    let k = &calib.radial_distortion;
    let [p1, p2] = calib.tangential_distortion;

    let xp = xy.x;
    let yp = xy.y;
    let xp2 = xp * xp;
    let yp2 = yp * yp;
    let xyp = xp * yp;

    let rs = xp2 + yp2;
    if rs > MAX_PROJECTION_RADIUS * MAX_PROJECTION_RADIUS {
        return None;
    }

    let (a, b) = radial_terms(k, rs);
    let bi = guarded_recip(b);
    let d = a * bi;

    let mut xp_d = xp * d;
    let mut yp_d = yp * d;
    xp_d += (rs + 2.0 * xp2) * p2 + 2.0 * xyp * p1;
    yp_d += (rs + 2.0 * yp2) * p1 + 2.0 * xyp * p2;

    let pixel = Vec2::new(
        calib.fov_x * xp_d + calib.c_x,
        calib.fov_y * yp_d + calib.c_y,
    );

    // Quotient rule for d = a/b, with da/drs and db/drs from the cubic.
    let rss = rs * rs;
    let dadrs = k[0] + 2.0 * k[1] * rs + 3.0 * k[2] * rss;
    let dbdrs = k[3] + 2.0 * k[4] * rs + 3.0 * k[5] * rss;
    let dddrs = (dadrs * b - a * dbdrs) * (bi * bi);

    let dddrs_2 = 2.0 * dddrs;
    let jacobian = Mat2::new(
        calib.fov_x * (d + xp2 * dddrs_2 + 6.0 * xp * p2 + 2.0 * yp * p1),
        calib.fov_x * (xyp * dddrs_2 + 2.0 * yp * p2 + 2.0 * xp * p1),
        calib.fov_y * (xyp * dddrs_2 + 2.0 * xp * p1 + 2.0 * yp * p2),
        calib.fov_y * (d + yp2 * dddrs_2 + 6.0 * yp * p1 + 2.0 * xp * p2),
    );

    Some(DistortionEval { pixel, jacobian })
}

/// First-order closed-form inverse of the distortion map.
///
/// Inverts the radial ratio (numerator and denominator swapped, same zero
/// guard as the forward direction) and subtracts an approximate tangential
/// correction. The result seeds the Newton refinement in
/// [`crate::unproject`]; it is not exact on its own.
pub fn undistort_pixel_approx(calib: &IntrinsicParameters, pixel: Vec2) -> Vec2 {
    let [p1, p2] = calib.tangential_distortion;

    let xp_d = (pixel.x - calib.c_x) / calib.fov_x;
    let yp_d = (pixel.y - calib.c_y) / calib.fov_y;

    let rs = xp_d * xp_d + yp_d * yp_d;
    let (a, b) = radial_terms(&calib.radial_distortion, rs);
    let di = guarded_recip(a) * b;

    let mut x = xp_d * di;
    let mut y = yp_d * di;

    let two_xy = 2.0 * x * y;
    let xx = x * x;
    let yy = y * y;

    x -= (yy + 3.0 * xx) * p2 + two_xy * p1;
    y -= (xx + 3.0 * yy) * p1 + two_xy * p2;

    Vec2::new(x, y)
}
