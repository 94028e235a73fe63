use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Mat3, Real};

/// Errors that make a calibration unusable for any transformation.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Both focal scales must be strictly positive.
    #[error("expect both fov_x and fov_y larger than 0, actual values are fov_x: {fov_x}, fov_y: {fov_y}")]
    NonPositiveFocal {
        /// Offending focal scale along X.
        fov_x: Real,
        /// Offending focal scale along Y.
        fov_y: Real,
    },
}

fn default_metric_radius() -> Real {
    1.7
}

/// Intrinsic parameters of one calibrated camera.
///
/// `fov_x`/`fov_y` are focal-length scale factors in pixels per normalized
/// unit and `c_x`/`c_y` the principal point in pixels. The six radial
/// coefficients k1..k6 parameterize the rational radial term and `p1`/`p2`
/// the tangential term of the Brown-Conrady model.
///
/// The value is treated as read-only input by every operation in this crate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntrinsicParameters {
    /// Focal scale along X (pixels per normalized unit).
    pub fov_x: Real,
    /// Focal scale along Y (pixels per normalized unit).
    pub fov_y: Real,
    /// Principal point X coordinate in pixels.
    pub c_x: Real,
    /// Principal point Y coordinate in pixels.
    pub c_y: Real,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Rational radial distortion coefficients k1..k6.
    pub radial_distortion: [Real; 6],
    /// Tangential distortion coefficients p1, p2.
    pub tangential_distortion: [Real; 2],
    /// Declared maximum valid normalized radius. Carried with the
    /// calibration but not consulted by the validity check, which uses
    /// [`MAX_PROJECTION_RADIUS`](crate::MAX_PROJECTION_RADIUS).
    #[serde(default = "default_metric_radius")]
    pub metric_radius: Real,
}

impl IntrinsicParameters {
    /// Build a calibration from its components.
    ///
    /// `metric_radius` starts at its 1.7 default and stays publicly
    /// settable.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fov_x: Real,
        fov_y: Real,
        c_x: Real,
        c_y: Real,
        width: u32,
        height: u32,
        radial_distortion: [Real; 6],
        tangential_distortion: [Real; 2],
    ) -> Self {
        Self {
            fov_x,
            fov_y,
            c_x,
            c_y,
            width,
            height,
            radial_distortion,
            tangential_distortion,
            metric_radius: default_metric_radius(),
        }
    }

    /// Check that the calibration can be used for projection at all.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::NonPositiveFocal`] when either focal
    /// scale is zero or negative.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.fov_x > 0.0 && self.fov_y > 0.0 {
            Ok(())
        } else {
            Err(CalibrationError::NonPositiveFocal {
                fov_x: self.fov_x,
                fov_y: self.fov_y,
            })
        }
    }

    /// Return the 3x3 camera intrinsics matrix K.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fov_x, 0.0, self.c_x, 0.0, self.fov_y, self.c_y, 0.0, 0.0, 1.0,
        )
    }
}

/// Exact field-wise comparison with no tolerance; two calibrations are equal
/// only when every float matches bit-for-bit after normalization of zero
/// signs under `==`.
///
/// `metric_radius` does not participate: calibrations that differ only in
/// the declared metric radius describe the same transformation.
impl PartialEq for IntrinsicParameters {
    fn eq(&self, other: &Self) -> bool {
        self.fov_x == other.fov_x
            && self.fov_y == other.fov_y
            && self.c_x == other.c_x
            && self.c_y == other.c_y
            && self.width == other.width
            && self.height == other.height
            && self.radial_distortion == other.radial_distortion
            && self.tangential_distortion == other.tangential_distortion
    }
}
