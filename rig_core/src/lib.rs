//! # rig_core - Truss Rigging Solver
//!
//! `rig_core` answers the two questions asked before a truss goes up: how much
//! load does each hoist carry, and does the truss stay inside its rated moment
//! and deflection? All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **SI Units**: metres, kilograms, newtons, newton-metres
//!
//! ## Quick Start
//!
//! ```rust
//! use rig_core::calculations::{solve_with_options, suggest};
//! use rig_core::catalog::{HoistCatalog, TrussCatalog};
//! use rig_core::rigging::{Fixture, SolveOptions, Support};
//!
//! let truss = TrussCatalog::built_in().get("box290-8m").unwrap();
//! let fixtures = vec![Fixture::new(2.0, 18.0).with_qty(2), Fixture::new(6.0, 36.0)];
//! let supports = vec![Support::new(0.5, "SL"), Support::new(7.5, "SR")];
//!
//! let result = solve_with_options(truss, &fixtures, &supports, &SolveOptions::default()).unwrap();
//! let picks = suggest(&result.support_reactions_kg, &supports, HoistCatalog::built_in()).unwrap();
//!
//! assert_eq!(picks.len(), 2);
//! println!("{} (governed by {})", result.status(), result.governing_condition());
//! ```
//!
//! ## Modules
//!
//! - [`rigging`] - Fixtures, supports and solve options
//! - [`catalog`] - Truss models and hoist capacities
//! - [`calculations`] - Beam solver and hoist selector
//! - [`plan`] - Rig plan container and plan-wide solve
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Plan files with atomic saves; catalog JSON loading

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod plan;
pub mod rigging;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{solve, solve_with_options, suggest, HoistPick, SolveResult};
pub use errors::{RigError, RigResult};
pub use file_io::{load_plan, save_plan};
pub use plan::{solve_plan, PlanReport, RigPlan, TrussRig};
