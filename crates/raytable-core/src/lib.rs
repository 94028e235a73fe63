//! Pinhole + Brown-Conrady camera transformations for `raytable-rs`.
//!
//! This crate models one calibrated camera and converts between distorted
//! pixels and camera-frame rays:
//!
//! - [`project_point`]: 3D point → distorted pixel (forward model),
//! - [`unproject_point`] / [`unproject_normalized`]: distorted pixel → ray,
//!   via an analytic seed refined by Newton-Raphson on the model's
//!   closed-form Jacobian,
//! - [`build_xy_table`]: dense per-pixel unit-depth ray lookup table.
//!
//! Broken configurations (non-positive focal scale) fail with
//! [`CalibrationError`]; per-point outcomes (behind camera, outside the
//! validity radius, non-convergence) are reported through `valid` flags on
//! the results instead.

/// Linear algebra type aliases.
pub mod math;
/// Camera description and the distortion map.
pub mod models;
/// Forward projection.
pub mod project;
/// Lookup-table construction.
pub mod table;
/// Iterative unprojection.
pub mod unproject;

pub use math::*;
pub use models::*;
pub use project::*;
pub use table::*;
pub use unproject::*;
