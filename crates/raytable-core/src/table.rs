//! Dense per-pixel ray lookup table.
//!
//! Precomputes the unit-depth ray direction for every pixel of a calibrated
//! image, so a consumer can turn a depth frame into 3D points with one
//! multiply per pixel instead of one Newton solve per pixel.

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::models::{CalibrationError, IntrinsicParameters};
use crate::unproject::unproject_point;
use crate::{Real, Vec2};

/// Per-pixel unit-depth ray directions for one calibration.
///
/// `data` is row-major with two entries per pixel: indices
/// `2 * (y * width + x)` and the one after hold the x and y components of
/// the ray through pixel (x, y); the z component is implicitly 1. Pixels
/// whose unprojection did not converge hold (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyTable {
    /// Table width in pixels, copied from the source calibration.
    pub width: u32,
    /// Table height in pixels, copied from the source calibration.
    pub height: u32,
    /// Interleaved x/y ray components, `width * height * 2` entries.
    pub data: Vec<Real>,
}

impl XyTable {
    /// Ray x/y components for pixel (x, y), or `None` outside the table.
    pub fn ray(&self, x: u32, y: u32) -> Option<Vec2> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = 2 * (y as usize * self.width as usize + x as usize);
        Some(Vec2::new(self.data[idx], self.data[idx + 1]))
    }
}

/// Build the ray lookup table for `calib`.
///
/// Sweeps every pixel in row-major order and unprojects it at unit depth.
/// Pixels that fail to converge are stored as (0, 0) and reported through a
/// `log` record naming the coordinate; they never abort the sweep.
///
/// # Errors
///
/// Returns [`CalibrationError`] when the calibration has a non-positive
/// focal scale; nothing is allocated in that case.
pub fn build_xy_table(calib: &IntrinsicParameters) -> Result<XyTable, CalibrationError> {
    calib.validate()?;

    let width = calib.width as usize;
    let height = calib.height as usize;
    let stride = width * 2;
    let mut data = vec![0.0; width * height * 2];

    // Rows are disjoint slices; the sweep stays embarrassingly parallel.
    for y in 0..height {
        let row = &mut data[y * stride..(y + 1) * stride];
        fill_row(calib, y as u32, row);
    }

    Ok(XyTable {
        width: calib.width,
        height: calib.height,
        data,
    })
}

/// Unproject one image row into its table slice.
fn fill_row(calib: &IntrinsicParameters, y: u32, row: &mut [Real]) {
    for x in 0..calib.width {
        let pixel = Vec2::new(Real::from(x), Real::from(y));
        let slot = 2 * x as usize;
        match unproject_point(calib, pixel, 1.0) {
            Ok(ray) if ray.valid => {
                row[slot] = ray.point.x;
                row[slot + 1] = ray.point.y;
            }
            Ok(_) => {
                // Slot keeps the zero substitute.
                warn!("invalid unprojection at pixel ({x}, {y})");
            }
            Err(err) => {
                error!("unprojection failed at pixel ({x}, {y}): {err}");
            }
        }
    }
}
