//! End-to-end projection/unprojection properties on full calibrations.
//!
//! Validates that the iterative unprojection inverts the forward model
//! across the pixel grid, and that the lookup table reproduces the solver's
//! per-pixel results.

use raytable_core::{
    build_xy_table, project_point, unproject_normalized, unproject_point, CalibrationError,
    IntrinsicParameters, Pt3, Real, Vec2, Vec3,
};

fn simple_calib() -> IntrinsicParameters {
    IntrinsicParameters::new(500.0, 500.0, 50.0, 50.0, 100, 100, [0.0; 6], [0.0; 2])
}

fn distorted_calib() -> IntrinsicParameters {
    let mut calib = simple_calib();
    calib.radial_distortion = [-0.28, 0.06, 0.001, 0.0005, -0.0002, 0.0];
    calib.tangential_distortion = [0.0008, -0.0005];
    calib
}

#[test]
fn zero_distortion_roundtrip_recovers_pixels() {
    let calib = simple_calib();

    for y in (1..100).step_by(7) {
        for x in (1..100).step_by(7) {
            let uv = Vec2::new(Real::from(x), Real::from(y));

            let ray = unproject_point(&calib, uv, 1.0).expect("calibration is valid");
            assert!(ray.valid, "unprojection should converge at {uv:?}");

            let proj =
                project_point(&calib, &Pt3::from(ray.point)).expect("calibration is valid");
            assert!(proj.valid);

            let err = (proj.pixel - uv).norm();
            assert!(err < 1e-4, "roundtrip error {err} too large at {uv:?}");
        }
    }
}

#[test]
fn distorted_roundtrip_stays_within_acceptance() {
    let calib = distorted_calib();

    for y in (1..100).step_by(9) {
        for x in (1..100).step_by(9) {
            let uv = Vec2::new(Real::from(x), Real::from(y));

            let ray = unproject_point(&calib, uv, 1.0).expect("calibration is valid");
            assert!(ray.valid, "unprojection should converge at {uv:?}");

            let proj =
                project_point(&calib, &Pt3::from(ray.point)).expect("calibration is valid");
            assert!(proj.valid);

            // Accepted solves sit below 1e-6 squared pixel error.
            let err = (proj.pixel - uv).norm();
            assert!(err < 1e-3, "roundtrip error {err} too large at {uv:?}");
        }
    }
}

#[test]
fn concrete_scenario_principal_point() {
    let calib = simple_calib();

    let ray = unproject_point(&calib, Vec2::new(50.0, 50.0), 1.0).unwrap();
    assert!(ray.valid);
    assert!((ray.point - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);

    let proj = project_point(&calib, &Pt3::new(0.0, 0.0, 1.0)).unwrap();
    assert!(proj.valid);
    assert!((proj.pixel - Vec2::new(50.0, 50.0)).norm() < 1e-12);
}

#[test]
fn depth_zero_is_always_invalid() {
    for calib in [simple_calib(), distorted_calib()] {
        for uv in [Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), Vec2::new(99.0, 1.0)] {
            let result = unproject_point(&calib, uv, 0.0).unwrap();
            assert!(!result.valid);
            assert_eq!(result.point, Vec3::zeros());
        }
    }
}

#[test]
fn behind_camera_is_always_invalid() {
    let calib = distorted_calib();
    for z in [0.0, -0.5, -100.0] {
        let proj = project_point(&calib, &Pt3::new(0.1, 0.2, z)).unwrap();
        assert!(!proj.valid);
        assert_eq!(proj.pixel, Vec2::zeros());
    }
}

#[test]
fn broken_configuration_fails_every_operation() {
    let mut calib = distorted_calib();
    calib.fov_x = 0.0;

    assert!(matches!(
        project_point(&calib, &Pt3::new(0.0, 0.0, 1.0)),
        Err(CalibrationError::NonPositiveFocal { .. })
    ));
    assert!(matches!(
        unproject_point(&calib, Vec2::new(50.0, 50.0), 1.0),
        Err(CalibrationError::NonPositiveFocal { .. })
    ));
    assert!(matches!(
        unproject_normalized(&calib, Vec2::new(50.0, 50.0)),
        Err(CalibrationError::NonPositiveFocal { .. })
    ));
    assert!(matches!(
        build_xy_table(&calib),
        Err(CalibrationError::NonPositiveFocal { .. })
    ));
}

#[test]
fn table_slots_match_solver_output() {
    let mut calib = distorted_calib();
    calib.width = 10;
    calib.height = 8;
    calib.c_x = 5.0;
    calib.c_y = 4.0;

    let table = build_xy_table(&calib).unwrap();
    assert_eq!(table.data.len(), 10 * 8 * 2);

    for y in 0..8u32 {
        for x in 0..10u32 {
            let expected =
                unproject_point(&calib, Vec2::new(Real::from(x), Real::from(y)), 1.0).unwrap();
            let idx = 2 * (y as usize * 10 + x as usize);
            if expected.valid {
                assert_eq!(table.data[idx], expected.point.x);
                assert_eq!(table.data[idx + 1], expected.point.y);
            } else {
                assert_eq!(table.data[idx], 0.0);
                assert_eq!(table.data[idx + 1], 0.0);
            }
        }
    }
}
