//! # Truss Beam Solver
//!
//! Support reactions, bending moment and deflection envelopes for a truss hung
//! from two or more pick-up points.
//!
//! ## Load Model
//!
//! Every gravity load is projected onto the truss normal by `cos(tilt)`:
//!
//! - Fixtures: `weight_kg × qty × dynamic_factor × cos(tilt) × g`
//! - Motors (optional): `motor_weight_kg_each × cos(tilt) × g` at each support
//! - Self-weight (optional): `mass_per_m_kg × cos(tilt) × g` per metre
//!
//! The dynamic factor applies to fixtures only.
//!
//! ## Example
//!
//! ```rust
//! use rig_core::calculations::beam_solver::solve_with_options;
//! use rig_core::catalog::TrussCatalog;
//! use rig_core::rigging::{Fixture, SolveOptions, Support};
//!
//! let truss = TrussCatalog::built_in().get("box290-8m").unwrap();
//! let fixtures = vec![Fixture::new(4.0, 40.0)];
//! let supports = vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")];
//! let options = SolveOptions { dynamic_factor: 1.2, ..Default::default() };
//!
//! let result = solve_with_options(truss, &fixtures, &supports, &options).unwrap();
//! assert!((result.support_reactions_kg[0] - 24.0).abs() < 1e-6);
//! println!("Max moment: {:.0} N·m ({})", result.max_moment_nm, result.status());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use super::beam_fem::{BeamModel, Mesh, MERGE_TOLERANCE_M};
use crate::catalog::TrussModel;
use crate::errors::{RigError, RigResult};
use crate::rigging::{
    clamp_position, transverse_factor, Fixture, Geometry, LoadSet, SolveOptions, Support,
};
use crate::units::{Kilograms, Newtons, STANDARD_GRAVITY};

/// Independent pass/fail of each rated allowable (equality passes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowableChecks {
    /// `max_moment_nm <= truss.max_moment_nm`
    pub moment: bool,

    /// `max_deflection_m <= truss.max_deflection_m`
    pub deflection: bool,
}

/// Output of a truss solve.
///
/// ## JSON Example
///
/// ```json
/// {
///   "support_reactions_kg": [24.0, 24.0],
///   "max_moment_nm": 753.2,
///   "max_moment_position_m": 4.0,
///   "max_deflection_m": 0.0012,
///   "max_deflection_position_m": 4.0,
///   "ok_against_allowables": { "moment": true, "deflection": true },
///   "moment_unity": 0.05,
///   "deflection_unity": 0.03,
///   "total_load_kg": 48.0,
///   "moment_diagram": [[0.0, 0.0], "..."],
///   "deflection_diagram": [[0.0, -0.0011], "..."]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    // === Reactions ===
    /// Reaction at each support, input order (kg, positive = hoist carries load)
    pub support_reactions_kg: Vec<f64>,

    // === Moment ===
    /// Largest absolute bending moment (N·m)
    pub max_moment_nm: f64,

    /// Where the largest moment occurs (m)
    pub max_moment_position_m: f64,

    // === Deflection ===
    /// Largest absolute transverse deflection (m)
    pub max_deflection_m: f64,

    /// Where the largest deflection occurs (m)
    pub max_deflection_position_m: f64,

    // === Checks ===
    /// Comparison against the truss model's allowables
    pub ok_against_allowables: AllowableChecks,

    /// max_moment / allowable moment
    pub moment_unity: f64,

    /// max_deflection / allowable deflection
    pub deflection_unity: f64,

    /// Total transverse load applied, including any motor and self-weight (kg)
    pub total_load_kg: f64,

    // === Diagrams ===
    /// `(x_m, moment_nm)`, sagging positive
    pub moment_diagram: Vec<(f64, f64)>,

    /// `(x_m, deflection_m)`, downward positive
    pub deflection_diagram: Vec<(f64, f64)>,
}

impl SolveResult {
    /// Both allowables satisfied
    pub fn passes(&self) -> bool {
        self.ok_against_allowables.moment && self.ok_against_allowables.deflection
    }

    /// "PASS" or "FAIL"
    pub fn status(&self) -> &'static str {
        if self.passes() {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// Highest unity ratio
    pub fn governing_unity(&self) -> f64 {
        self.moment_unity.max(self.deflection_unity)
    }

    /// Which check is closest to (or furthest past) its limit
    pub fn governing_condition(&self) -> &'static str {
        if self.moment_unity >= self.deflection_unity {
            "Moment"
        } else {
            "Deflection"
        }
    }

    /// Sum of support reactions (kg)
    pub fn total_reaction_kg(&self) -> f64 {
        self.support_reactions_kg.iter().sum()
    }
}

/// Solve with options bundled in one [`SolveOptions`]
pub fn solve_with_options(
    truss: &TrussModel,
    fixtures: &[Fixture],
    supports: &[Support],
    options: &SolveOptions,
) -> RigResult<SolveResult> {
    solve(
        truss,
        &LoadSet::from_options(fixtures.to_vec(), options),
        &Geometry::from_options(supports.to_vec(), options),
    )
}

/// Solve a truss for reactions and moment/deflection envelopes.
///
/// # Errors
///
/// - [`RigError::InvalidInput`] for a bad truss model or option
/// - [`RigError::TooFewSupports`] with fewer than two supports
/// - [`RigError::InvalidPosition`] for a non-finite position
/// - [`RigError::DuplicateSupports`] for two supports at the same point
/// - [`RigError::SingularSystem`] if the stiffness system cannot be solved
pub fn solve(truss: &TrussModel, loads: &LoadSet, geometry: &Geometry) -> RigResult<SolveResult> {
    let _span = debug_span!("solve", truss = %truss.id).entered();

    truss.validate()?;
    geometry.validate()?;
    loads.validate()?;

    let length = truss.length_m;
    let support_xs = support_positions(&geometry.supports, length)?;
    let fixture_loads = fixture_positions(&loads.fixtures, length)?;

    let cos_tilt = transverse_factor(geometry.tilt_deg);
    let mesh_fixtures: Vec<f64> = fixture_loads.iter().map(|(x, _)| *x).collect();
    let mesh = Mesh::build(length, geometry.n_elements, &support_xs, &mesh_fixtures);
    debug!(
        nodes = mesh.node_count(),
        elements = mesh.element_count(),
        "mesh built"
    );

    let mut model = BeamModel::new(mesh, truss.ei_nm2);
    for &x in &support_xs {
        model.add_support(x)?;
    }
    for &(x, weight_kg) in &fixture_loads {
        let weight = weight_kg * loads.dynamic_factor * cos_tilt;
        model.add_point_load(x, -Newtons::from(Kilograms(weight)).0);
    }
    let motor_kg = loads.motor_weight_kg() * cos_tilt;
    if motor_kg > 0.0 {
        for &x in &support_xs {
            model.add_point_load(x, -Newtons::from(Kilograms(motor_kg)).0);
        }
    }
    if loads.include_self_weight {
        model.add_uniform_load(-truss.mass_per_m_kg * cos_tilt * STANDARD_GRAVITY);
    }

    let total_load_kg = -model.total_load_n() / STANDARD_GRAVITY;
    debug!(total_load_kg, cos_tilt, "loads applied");

    let response = model.solve()?;

    let support_reactions_kg: Vec<f64> = response
        .support_reactions_n
        .iter()
        .map(|&r| Kilograms::from(Newtons(r)).0)
        .collect();

    let (max_moment_position_m, max_moment_nm) = abs_peak(&response.moment_samples);
    let deflection_diagram: Vec<(f64, f64)> = response
        .deflection_samples
        .iter()
        .map(|&(x, v)| (x, -v))
        .collect();
    let (max_deflection_position_m, max_deflection_m) = abs_peak(&deflection_diagram);

    debug!(
        max_moment_nm,
        max_deflection_m,
        reactions = ?support_reactions_kg,
        "solved"
    );

    Ok(SolveResult {
        support_reactions_kg,
        max_moment_nm,
        max_moment_position_m,
        max_deflection_m,
        max_deflection_position_m,
        ok_against_allowables: AllowableChecks {
            moment: max_moment_nm <= truss.max_moment_nm,
            deflection: max_deflection_m <= truss.max_deflection_m,
        },
        moment_unity: max_moment_nm / truss.max_moment_nm,
        deflection_unity: max_deflection_m / truss.max_deflection_m,
        total_load_kg,
        moment_diagram: response.moment_samples,
        deflection_diagram,
    })
}

/// Clamped support positions; rejects coincident supports
fn support_positions(supports: &[Support], length_m: f64) -> RigResult<Vec<f64>> {
    let xs = supports
        .iter()
        .map(|s| clamp_position(s.x_m, length_m, format!("support '{}'", s.label)))
        .collect::<RigResult<Vec<f64>>>()?;

    for (i, &xi) in xs.iter().enumerate() {
        for (j, &xj) in xs.iter().enumerate().skip(i + 1) {
            if (xi - xj).abs() <= MERGE_TOLERANCE_M {
                return Err(RigError::DuplicateSupports {
                    first: supports[i].label.clone(),
                    second: supports[j].label.clone(),
                    x_m: xi,
                });
            }
        }
    }
    Ok(xs)
}

/// Clamped fixture positions paired with total static weight (kg)
fn fixture_positions(fixtures: &[Fixture], length_m: f64) -> RigResult<Vec<(f64, f64)>> {
    fixtures
        .iter()
        .enumerate()
        .map(|(i, fixture)| {
            if !fixture.weight_kg.is_finite() || fixture.weight_kg < 0.0 {
                return Err(RigError::invalid_input(
                    "weight_kg",
                    fixture.weight_kg.to_string(),
                    format!("Weight of {} must be a non-negative number", fixture.describe(i)),
                ));
            }
            let x = clamp_position(fixture.x_m, length_m, fixture.describe(i))?;
            Ok((x, fixture.total_weight_kg()))
        })
        .collect()
}

/// `(x, |value|)` of the largest magnitude sample; first one wins ties
fn abs_peak(samples: &[(f64, f64)]) -> (f64, f64) {
    samples
        .iter()
        .fold((0.0, 0.0), |(best_x, best), &(x, value)| {
            if value.abs() > best {
                (x, value.abs())
            } else {
                (best_x, best)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrussCatalog;

    fn box_8m() -> &'static TrussModel {
        TrussCatalog::built_in().get("box290-8m").unwrap()
    }

    fn two_hoists() -> Vec<Support> {
        vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")]
    }

    #[test]
    fn test_centered_load_reactions() {
        let fixtures = vec![Fixture::new(4.0, 40.0)];
        let options = SolveOptions {
            dynamic_factor: 1.2,
            ..Default::default()
        };
        let result = solve_with_options(box_8m(), &fixtures, &two_hoists(), &options).unwrap();

        assert!((result.support_reactions_kg[0] - 24.0).abs() < 1e-6);
        assert!((result.support_reactions_kg[1] - 24.0).abs() < 1e-6);
        assert!((result.total_load_kg - 48.0).abs() < 1e-9);

        // P·a·b/L over the 6.4 m inner span
        let expected = 48.0 * STANDARD_GRAVITY * 3.2 * 3.2 / 6.4;
        assert!((result.max_moment_nm - expected).abs() / expected < 1e-6);
        assert!((result.max_moment_position_m - 4.0).abs() < 1e-9);
        assert!((result.max_deflection_position_m - 4.0).abs() < 1e-9);
        assert!(result.passes());
        assert_eq!(result.status(), "PASS");
    }

    #[test]
    fn test_too_few_supports() {
        let err = solve_with_options(
            box_8m(),
            &[Fixture::new(4.0, 10.0)],
            &[Support::new(4.0, "M1")],
            &SolveOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, RigError::TooFewSupports { count: 1 });
    }

    #[test]
    fn test_duplicate_supports_after_clamping() {
        let supports = vec![
            Support::new(-1.0, "A"),
            Support::new(4.0, "B"),
            Support::new(0.0, "C"),
        ];
        let err = solve_with_options(box_8m(), &[], &supports, &SolveOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            RigError::DuplicateSupports {
                first: "A".to_string(),
                second: "C".to_string(),
                x_m: 0.0,
            }
        );
    }

    #[test]
    fn test_non_finite_fixture_position() {
        let fixtures = vec![Fixture::new(f64::NAN, 10.0).with_name("Par")];
        let err = solve_with_options(box_8m(), &fixtures, &two_hoists(), &SolveOptions::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_POSITION");
    }

    #[test]
    fn test_negative_fixture_weight() {
        let fixtures = vec![Fixture::new(2.0, -5.0)];
        let err = solve_with_options(box_8m(), &fixtures, &two_hoists(), &SolveOptions::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_fixture_beyond_end_is_clamped() {
        let clamped = solve_with_options(
            box_8m(),
            &[Fixture::new(9.5, 20.0)],
            &two_hoists(),
            &SolveOptions::default(),
        )
        .unwrap();
        let at_end = solve_with_options(
            box_8m(),
            &[Fixture::new(8.0, 20.0)],
            &two_hoists(),
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(clamped.support_reactions_kg, at_end.support_reactions_kg);
    }

    #[test]
    fn test_vertical_truss_carries_nothing() {
        let options = SolveOptions {
            tilt_deg: 90.0,
            include_self_weight: true,
            ..Default::default()
        };
        let result =
            solve_with_options(box_8m(), &[Fixture::new(3.0, 50.0)], &two_hoists(), &options)
                .unwrap();
        assert_eq!(result.max_moment_nm, 0.0);
        assert_eq!(result.max_deflection_m, 0.0);
        assert!(result.support_reactions_kg.iter().all(|r| r.abs() < 1e-12));
    }

    #[test]
    fn test_motor_weight_goes_straight_to_supports() {
        let options = SolveOptions {
            include_motor_weight_on_truss: true,
            motor_weight_kg_each: 30.0,
            ..Default::default()
        };
        let result = solve_with_options(box_8m(), &[], &two_hoists(), &options).unwrap();
        for reaction in &result.support_reactions_kg {
            assert!((reaction - 30.0).abs() < 1e-6);
        }
        assert!(result.max_moment_nm < 1e-6);
    }

    #[test]
    fn test_self_weight_simple_span() {
        // Supports at the ends: M = wL²/8, δ = 5wL⁴/384EI
        let truss = box_8m();
        let supports = vec![Support::new(0.0, "L"), Support::new(8.0, "R")];
        let options = SolveOptions {
            include_self_weight: true,
            ..Default::default()
        };
        let result = solve_with_options(truss, &[], &supports, &options).unwrap();

        let w = truss.mass_per_m_kg * STANDARD_GRAVITY;
        let expected_m = w * 64.0 / 8.0;
        let expected_d = 5.0 * w * 8.0_f64.powi(4) / (384.0 * truss.ei_nm2);
        assert!((result.max_moment_nm - expected_m).abs() / expected_m < 1e-9);
        assert!((result.max_deflection_m - expected_d).abs() / expected_d < 1e-9);
        assert!((result.total_load_kg - truss.self_weight_kg()).abs() < 1e-9);
    }

    #[test]
    fn test_governing_condition() {
        let mut result = solve_with_options(
            box_8m(),
            &[Fixture::new(4.0, 40.0)],
            &two_hoists(),
            &SolveOptions::default(),
        )
        .unwrap();
        result.moment_unity = 0.4;
        result.deflection_unity = 0.9;
        assert_eq!(result.governing_condition(), "Deflection");
        assert!((result.governing_unity() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_abs_peak_picks_hogging() {
        let samples = vec![(0.0, 0.0), (1.0, 5.0), (2.0, -7.0), (3.0, 7.0)];
        assert_eq!(abs_peak(&samples), (2.0, 7.0));
    }
}
