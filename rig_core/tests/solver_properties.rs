//! Physical properties the solver must satisfy for any valid rig.

use approx::{assert_abs_diff_eq, assert_relative_eq};

use rig_core::calculations::{solve, solve_with_options, suggest, SolveResult};
use rig_core::catalog::{HoistCatalog, TrussCatalog, TrussModel};
use rig_core::rigging::{Fixture, Geometry, LoadSet, SolveOptions, Support};
use rig_core::units::STANDARD_GRAVITY;
use rig_core::RigError;

fn truss(id: &str) -> TrussModel {
    TrussCatalog::built_in().get(id).unwrap().clone()
}

fn run(
    truss: &TrussModel,
    fixtures: &[Fixture],
    supports: &[Support],
    options: &SolveOptions,
) -> SolveResult {
    solve_with_options(truss, fixtures, supports, options).unwrap()
}

fn elements(n_elements: usize) -> SolveOptions {
    SolveOptions {
        n_elements,
        ..Default::default()
    }
}

#[test]
fn test_end_to_end_two_hoist_scenario() {
    let truss = truss("box290-8m");
    let supports = vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")];
    let options = SolveOptions {
        dynamic_factor: 1.2,
        ..Default::default()
    };
    let result = run(&truss, &[Fixture::new(4.0, 40.0)], &supports, &options);

    assert_relative_eq!(result.support_reactions_kg[0], 24.0, max_relative = 1e-9);
    assert_relative_eq!(result.support_reactions_kg[1], 24.0, max_relative = 1e-9);

    let p = 48.0 * STANDARD_GRAVITY;
    assert_relative_eq!(result.max_moment_nm, p * 3.2 * 3.2 / 6.4, max_relative = 1e-9);
    assert!(result.ok_against_allowables.moment);
    assert!(result.ok_against_allowables.deflection);

    let picks = suggest(&result.support_reactions_kg, &supports, HoistCatalog::built_in()).unwrap();
    for pick in &picks {
        assert_eq!(pick.hoist.as_ref().unwrap().capacity_kg, 250.0);
    }
    assert_eq!(picks[0].support.label, "SL");
}

#[test]
fn test_mirrored_rig_mirrors_reactions() {
    let truss = truss("box290-10m");
    let options = SolveOptions {
        include_self_weight: true,
        ..Default::default()
    };
    let left = run(
        &truss,
        &[Fixture::new(2.0, 30.0), Fixture::new(5.5, 20.0)],
        &[Support::new(1.0, "A"), Support::new(9.0, "B")],
        &options,
    );
    let right = run(
        &truss,
        &[Fixture::new(8.0, 30.0), Fixture::new(4.5, 20.0)],
        &[Support::new(9.0, "A"), Support::new(1.0, "B")],
        &options,
    );

    for (l, r) in left.support_reactions_kg.iter().zip(&right.support_reactions_kg) {
        assert_relative_eq!(*l, *r, max_relative = 1e-9);
    }
    assert_relative_eq!(left.max_moment_nm, right.max_moment_nm, max_relative = 1e-9);
    assert_relative_eq!(
        left.max_deflection_m,
        right.max_deflection_m,
        max_relative = 1e-3
    );
}

#[test]
fn test_symmetric_rig_has_equal_reactions() {
    let truss = truss("box400-12m");
    let supports = vec![
        Support::new(0.5, "1"),
        Support::new(6.0, "2"),
        Support::new(11.5, "3"),
    ];
    let fixtures: Vec<Fixture> = [1.5, 4.0, 8.0, 10.5]
        .iter()
        .map(|&x| Fixture::new(x, 25.0))
        .collect();
    let result = run(&truss, &fixtures, &supports, &SolveOptions::default());

    let r = &result.support_reactions_kg;
    assert_relative_eq!(r[0], r[2], max_relative = 1e-9);
}

#[test]
fn test_reactions_balance_total_load() {
    let truss = truss("box400-16m");
    let supports = vec![
        Support::new(0.0, "M1"),
        Support::new(5.0, "M2"),
        Support::new(10.5, "M3"),
        Support::new(16.0, "M4"),
    ];
    let fixtures = vec![
        Fixture::new(1.2, 18.0).with_qty(4),
        Fixture::new(7.7, 42.0),
        Fixture::new(13.1, 9.5).with_qty(6),
        Fixture::new(15.9, 30.0),
    ];
    let options = SolveOptions {
        tilt_deg: 20.0,
        dynamic_factor: 1.3,
        include_motor_weight_on_truss: true,
        motor_weight_kg_each: 52.0,
        include_self_weight: true,
        ..Default::default()
    };
    let result = run(&truss, &fixtures, &supports, &options);

    let cos = 20.0_f64.to_radians().cos();
    let fixture_kg: f64 = fixtures.iter().map(|f| f.total_weight_kg()).sum();
    let expected = (fixture_kg * 1.3 + 4.0 * 52.0 + truss.self_weight_kg()) * cos;

    assert_relative_eq!(result.total_load_kg, expected, max_relative = 1e-9);
    assert_relative_eq!(result.total_reaction_kg(), expected, max_relative = 1e-9);
}

#[test]
fn test_tilt_reduces_load_to_zero() {
    let truss = truss("box290-8m");
    let supports = vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")];
    let fixtures = vec![Fixture::new(3.0, 60.0), Fixture::new(6.5, 25.0)];

    let mut previous: Option<SolveResult> = None;
    for tilt in [0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 90.0] {
        let options = SolveOptions {
            tilt_deg: tilt,
            include_self_weight: true,
            ..Default::default()
        };
        let result = run(&truss, &fixtures, &supports, &options);
        if let Some(prev) = &previous {
            assert!(result.max_moment_nm < prev.max_moment_nm);
            assert!(result.max_deflection_m < prev.max_deflection_m);
            let before = &prev.support_reactions_kg;
            for (now, before) in result.support_reactions_kg.iter().zip(before) {
                assert!(now < before);
            }
        }
        previous = Some(result);
    }

    let vertical = previous.unwrap();
    assert_eq!(vertical.max_moment_nm, 0.0);
    assert_eq!(vertical.max_deflection_m, 0.0);
    assert_eq!(vertical.total_load_kg, 0.0);
}

#[test]
fn test_mesh_refinement_converges() {
    let truss = truss("box290-8m");
    let supports = vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")];
    let fixtures = vec![Fixture::new(3.3, 40.0), Fixture::new(5.1, 22.0)];

    let coarse = run(&truss, &fixtures, &supports, &elements(8));
    let fine = run(&truss, &fixtures, &supports, &elements(128));

    assert_relative_eq!(coarse.max_moment_nm, fine.max_moment_nm, max_relative = 0.01);
    assert_relative_eq!(
        coarse.max_deflection_m,
        fine.max_deflection_m,
        max_relative = 0.01
    );
    for (c, f) in coarse.support_reactions_kg.iter().zip(&fine.support_reactions_kg) {
        assert_relative_eq!(*c, *f, max_relative = 0.01);
    }
}

#[test]
fn test_single_element_keeps_fixture_peaks() {
    // Fixtures are always mesh nodes, so even one requested element
    // resolves the peak moment under the heavier fixture
    let truss = truss("box290-8m");
    let supports = vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")];
    let fixtures = vec![Fixture::new(3.3, 40.0), Fixture::new(5.1, 22.0)];

    let coarse = run(&truss, &fixtures, &supports, &elements(1));
    let fine = run(&truss, &fixtures, &supports, &elements(128));

    assert_relative_eq!(coarse.max_moment_nm, fine.max_moment_nm, max_relative = 1e-6);
    assert_relative_eq!(coarse.max_moment_position_m, 3.3, epsilon = 1e-9);
    assert_relative_eq!(
        coarse.max_deflection_m,
        fine.max_deflection_m,
        max_relative = 5e-3
    );
}

#[test]
fn test_midspan_load_on_one_element() {
    let truss = truss("box290-4m");
    let supports = vec![Support::new(0.0, "L"), Support::new(4.0, "R")];
    let result = run(&truss, &[Fixture::new(2.0, 100.0)], &supports, &elements(1));

    // P·L/4
    let p = 100.0 * STANDARD_GRAVITY;
    assert_relative_eq!(result.max_moment_nm, p * 4.0 / 4.0, max_relative = 1e-9);
    assert_relative_eq!(result.max_moment_position_m, 2.0, epsilon = 1e-9);
}

#[test]
fn test_two_support_reactions_follow_statics_on_fine_mesh() {
    // Long overhang, element count at the upper limit, fixture just past
    // the front support
    let truss = truss("box400-16m");
    let supports = vec![Support::new(0.0, "BACK"), Support::new(1.0, "FRONT")];
    let fixtures = vec![Fixture::new(1.00081, 200.0)];
    let result = run(&truss, &fixtures, &supports, &elements(1000));

    let front = 200.0 * 1.00081;
    assert_relative_eq!(result.support_reactions_kg[1], front, max_relative = 1e-12);
    assert_relative_eq!(
        result.support_reactions_kg[0],
        200.0 - front,
        max_relative = 1e-9
    );
    assert_relative_eq!(result.total_reaction_kg(), 200.0, max_relative = 1e-12);
}

#[test]
fn test_three_equal_spans_with_midspan_loads() {
    // Continuous over four supports: R_end = 0.35P, R_inner = 1.15P,
    // M_support = -0.15PL, M_max = 0.175PL in the end spans
    let truss = truss("box290-12m");
    let span = 4.0;
    let supports: Vec<Support> = (0..4)
        .map(|i| Support::new(i as f64 * span, format!("S{}", i)))
        .collect();
    let fixtures: Vec<Fixture> = (0..3)
        .map(|i| Fixture::new(span * (i as f64 + 0.5), 100.0))
        .collect();
    let result = run(&truss, &fixtures, &supports, &SolveOptions::default());

    let r = &result.support_reactions_kg;
    assert_relative_eq!(r[0], 35.0, max_relative = 1e-9);
    assert_relative_eq!(r[1], 115.0, max_relative = 1e-9);
    assert_relative_eq!(r[2], 115.0, max_relative = 1e-9);
    assert_relative_eq!(r[3], 35.0, max_relative = 1e-9);

    let p = 100.0 * STANDARD_GRAVITY;
    assert_relative_eq!(result.max_moment_nm, 0.175 * p * span, max_relative = 1e-9);
    let over_support = result
        .moment_diagram
        .iter()
        .find(|(x, _)| (x - span).abs() < 1e-9)
        .unwrap();
    assert_relative_eq!(over_support.1, -0.15 * p * span, max_relative = 1e-9);
}

#[test]
fn test_overhang_load_lifts_far_support() {
    let truss = truss("box290-6m");
    let supports = vec![Support::new(0.0, "BACK"), Support::new(4.0, "FRONT")];
    let fixtures = [Fixture::new(6.0, 50.0)];
    let result = run(&truss, &fixtures, &supports, &SolveOptions::default());

    assert_relative_eq!(result.support_reactions_kg[0], -25.0, max_relative = 1e-9);
    assert_relative_eq!(result.support_reactions_kg[1], 75.0, max_relative = 1e-9);
    assert_relative_eq!(result.max_moment_position_m, 4.0, epsilon = 1e-9);

    let picks = suggest(&result.support_reactions_kg, &supports, HoistCatalog::built_in()).unwrap();
    assert!(picks[0].is_uplift());
    assert!(!picks[1].is_uplift());
}

#[test]
fn test_allowables_are_inclusive() {
    let mut model = truss("tri290-6m");
    let supports = vec![Support::new(0.3, "A"), Support::new(5.7, "B")];
    let fixtures = vec![Fixture::new(2.5, 80.0)];
    let baseline = run(&model, &fixtures, &supports, &SolveOptions::default());

    model.max_moment_nm = baseline.max_moment_nm;
    model.max_deflection_m = baseline.max_deflection_m;
    let at_limit = run(&model, &fixtures, &supports, &SolveOptions::default());
    assert!(at_limit.ok_against_allowables.moment);
    assert!(at_limit.ok_against_allowables.deflection);
    assert_relative_eq!(at_limit.moment_unity, 1.0, max_relative = 1e-15);

    model.max_moment_nm = baseline.max_moment_nm * (1.0 - 1e-9);
    let over_moment = run(&model, &fixtures, &supports, &SolveOptions::default());
    assert!(!over_moment.ok_against_allowables.moment);
    assert!(over_moment.ok_against_allowables.deflection);
    assert_eq!(over_moment.status(), "FAIL");
}

#[test]
fn test_hoist_selection_past_largest_unit() {
    let truss = truss("box400-8m");
    let supports = vec![Support::new(0.0, "L"), Support::new(8.0, "R")];
    let fixtures = [Fixture::new(4.0, 5000.0)];
    let result = run(&truss, &fixtures, &supports, &SolveOptions::default());

    let picks = suggest(&result.support_reactions_kg, &supports, HoistCatalog::built_in()).unwrap();
    for pick in &picks {
        assert!(pick.hoist.is_none());
        assert_relative_eq!(pick.required_kg, 2500.0, max_relative = 1e-9);
    }
}

#[test]
fn test_configuration_errors() {
    let truss = truss("box290-4m");
    let options = SolveOptions::default();

    let err = solve_with_options(&truss, &[], &[], &options).unwrap_err();
    assert_eq!(err, RigError::TooFewSupports { count: 0 });

    let err = solve_with_options(
        &truss,
        &[],
        &[Support::new(1.0, "A"), Support::new(1.0000001, "B")],
        &options,
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_SUPPORTS");
    assert!(err.is_configuration_error());

    let err = solve_with_options(
        &truss,
        &[],
        &[Support::new(f64::NEG_INFINITY, "A"), Support::new(1.0, "B")],
        &options,
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_POSITION");
}

#[test]
fn test_solve_with_split_inputs() {
    let truss = truss("box290-8m");
    let loads = LoadSet {
        fixtures: vec![Fixture::new(4.0, 40.0)],
        dynamic_factor: 1.2,
        include_motor_weight_on_truss: false,
        motor_weight_kg_each: 0.0,
        include_self_weight: false,
    };
    let geometry = Geometry {
        supports: vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")],
        tilt_deg: 0.0,
        n_elements: 32,
    };
    let result = solve(&truss, &loads, &geometry).unwrap();
    assert_abs_diff_eq!(result.total_reaction_kg(), 48.0, epsilon = 1e-9);

    let bad = LoadSet {
        dynamic_factor: 0.5,
        ..loads
    };
    let err = solve(&truss, &bad, &geometry).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}
