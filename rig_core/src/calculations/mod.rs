//! # Structural Calculations
//!
//! Each calculation is a pure function over JSON-serializable inputs:
//!
//! - [`beam_solver`] - `solve(truss, loads, geometry) -> SolveResult`
//! - [`hoist_selector`] - `suggest(reactions, supports, catalog) -> Vec<HoistPick>`
//!
//! [`beam_fem`] holds the finite element core both rest on.

pub mod beam_fem;
pub mod beam_solver;
pub mod hoist_selector;

pub use beam_solver::{solve, solve_with_options, AllowableChecks, SolveResult};
pub use hoist_selector::{suggest, HoistPick};
