//! Integration tests for the geostrophic and gravity forcing terms.
//!
//! These tests verify:
//! - Forcing vector against the closed-form expressions
//! - Pure additivity (repeated evaluation)
//! - Level and time state independence

use std::f64::consts::PI;

use abl_forcing::config::InputConfig;
use abl_forcing::source::{GeostrophicForcing, GravityForcing, SourceTerm};
use abl_forcing::{BlockIndex, CellArray, FieldState, IndexBox, LevelIndex, Vector3};

const TOL: f64 = 1e-14;

fn forcing_from_json(text: &str) -> GeostrophicForcing {
    let cfg = InputConfig::from_json_str(text).unwrap();
    GeostrophicForcing::from_config(&cfg).unwrap()
}

fn evaluate(term: &dyn SourceTerm, bx: &IndexBox, src: &mut CellArray) {
    term.evaluate(LevelIndex::ZERO, BlockIndex::ZERO, bx, FieldState::New, src)
        .unwrap();
}

/// One rotation per day at 45°N, 10 m/s westerly, horizontal Coriolis only.
#[test]
fn test_mid_latitude_westerly() {
    let g = forcing_from_json(
        r#"{
            "CoriolisForcing": { "rotational_time_period": 86400.0 },
            "GeostrophicForcing": { "geostrophic_wind": [10.0, 0.0, 0.0], "latitude": 45.0 }
        }"#,
    );

    assert!((g.coriolis_factor() - 1.4544e-4).abs() < 1e-8);
    let f = g.forcing();
    assert!(f.x.abs() < TOL);
    assert!((f.y - 1.0284e-3).abs() < 1e-6);
    assert!(f.z.abs() < TOL);

    // Exact recomputation
    let cf = 4.0 * PI / 86400.0;
    assert!((f.y - cf * 10.0 * (PI / 4.0).sin()).abs() < TOL);
}

/// Same site with the vertical Coriolis components switched on.
#[test]
fn test_three_component_forcing() {
    let g = forcing_from_json(
        r#"{
            "GeostrophicForcing": {
                "geostrophic_wind": [10.0, 0.0, 5.0],
                "latitude": 45.0,
                "three_ComponentForcing": true
            }
        }"#,
    );

    let cf = g.coriolis_factor();
    let (sinphi, cosphi) = (PI / 4.0).sin_cos();
    let f = g.forcing();

    assert!((f.x - (-cf * 0.0 * sinphi + cf * 5.0 * cosphi)).abs() < TOL);
    assert!((f.y - cf * 10.0 * sinphi).abs() < TOL);
    assert!((f.z - (-cf * 10.0 * cosphi)).abs() < TOL);
    assert!(f.x.abs() > 0.0);
    assert!(f.z.abs() > 0.0);
}

/// Numeric toggle values behave like booleans.
#[test]
fn test_numeric_toggle() {
    let on = forcing_from_json(
        r#"{ "GeostrophicForcing": { "geostrophic_wind": [10.0, 2.0, 5.0], "latitude": 60.0,
             "three_ComponentForcing": 1 } }"#,
    );
    let off = forcing_from_json(
        r#"{ "GeostrophicForcing": { "geostrophic_wind": [10.0, 2.0, 5.0], "latitude": 60.0,
             "three_ComponentForcing": 0 } }"#,
    );
    assert!(on.forcing().z != 0.0);
    assert_eq!(off.forcing().z, 0.0);
    assert_eq!(on.forcing().y, off.forcing().y);
}

/// The horizontal components follow F = f·sinφ·(−U_y, U_x).
#[test]
fn test_horizontal_balance() {
    for latitude in [-60.0, -10.0, 30.0, 75.0] {
        let wind = Vector3::new(7.0, -3.0, 0.0);
        let g = GeostrophicForcing::new(86164.0, latitude, wind, false).unwrap();
        let cf = g.coriolis_factor();
        let s = f64::to_radians(latitude).sin();
        let f = g.forcing();

        assert!((f.x - (-cf * wind.y * s)).abs() < TOL);
        assert!((f.y - cf * wind.x * s).abs() < TOL);
        // Perpendicular to the wind
        assert!((f.x * wind.x + f.y * wind.y).abs() < TOL);
    }
}

#[test]
fn test_double_evaluation_doubles_contribution() {
    let g = GeostrophicForcing::new(86400.0, 45.0, Vector3::new(10.0, 3.0, 2.0), true).unwrap();
    let bx = IndexBox::new([0, 0, 0], [7, 5, 3]);

    let mut once = CellArray::new(bx, 3);
    evaluate(&g, &bx, &mut once);

    let mut twice = CellArray::new(bx, 3);
    evaluate(&g, &bx, &mut twice);
    evaluate(&g, &bx, &mut twice);

    for (a, b) in once.data().iter().zip(twice.data()) {
        assert_eq!(2.0 * a, *b);
    }
}

#[test]
fn test_independent_of_level_and_state() {
    let g = GeostrophicForcing::new(86400.0, 45.0, Vector3::new(10.0, 0.0, 0.0), false).unwrap();
    let bx = IndexBox::from_dims([2, 2, 2]);

    let mut reference = CellArray::new(bx, 3);
    evaluate(&g, &bx, &mut reference);

    for fstate in FieldState::ALL {
        let mut src = CellArray::new(bx, 3);
        g.evaluate(LevelIndex::new(3), BlockIndex::new(5), &bx, fstate, &mut src)
            .unwrap();
        assert_eq!(src, reference, "{fstate}");
    }
}

#[test]
fn test_gravity_and_geostrophic_accumulate() {
    let g = GeostrophicForcing::new(86400.0, 45.0, Vector3::new(10.0, 0.0, 0.0), false).unwrap();
    let gravity = GravityForcing::new(Vector3::new(0.0, 0.0, -9.81));
    let bx = IndexBox::from_dims([3, 3, 3]);

    let mut src = CellArray::new(bx, 3);
    evaluate(&g, &bx, &mut src);
    evaluate(&gravity, &bx, &mut src);

    let f = g.forcing();
    for (i, j, k) in bx.iter() {
        assert!((src.get(i, j, k, 1) - f.y).abs() < TOL);
        assert!((src.get(i, j, k, 2) + 9.81).abs() < TOL);
    }
}
