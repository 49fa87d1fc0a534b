//! # Rig Plans
//!
//! A `RigPlan` is the root container for one production's rigging: every truss
//! line with its fixtures and pick-up points. Plans serialize to `.rig` files
//! as human-readable JSON (see [`file_io`](crate::file_io) for atomic saves).
//!
//! ## Structure
//!
//! ```text
//! RigPlan
//! ├── meta: PlanMetadata (version, production, venue, timestamps)
//! ├── settings: PlanSettings (default solve options)
//! └── trusses: Vec<TrussRig> (one per truss line)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rig_core::catalog::{HoistCatalog, TrussCatalog};
//! use rig_core::plan::{solve_plan, RigPlan, TrussRig};
//! use rig_core::rigging::{Fixture, Support};
//!
//! let mut plan = RigPlan::new("Summer Tour", "Arena North");
//! plan.add_truss(
//!     TrussRig::new("Upstage", "box290-8m")
//!         .with_fixture(Fixture::new(4.0, 40.0))
//!         .with_supports(vec![Support::new(0.8, "US1"), Support::new(7.2, "US2")]),
//! );
//!
//! let report = solve_plan(&plan, TrussCatalog::built_in(), HoistCatalog::built_in());
//! assert_eq!(report.solved_count(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug_span, warn};
use uuid::Uuid;

use crate::calculations::{solve_with_options, suggest, HoistPick, SolveResult};
use crate::catalog::{HoistCatalog, TrussCatalog};
use crate::errors::{RigError, RigResult};
use crate::rigging::{Fixture, SolveOptions, Support};

/// Current schema version for .rig files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root plan container, serialized to `.rig` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigPlan {
    /// Plan metadata (version, production, venue)
    pub meta: PlanMetadata,

    /// Plan-wide defaults
    #[serde(default)]
    pub settings: PlanSettings,

    /// Truss lines in display order
    #[serde(default)]
    pub trusses: Vec<TrussRig>,
}

impl RigPlan {
    /// Create an empty plan
    pub fn new(production: impl Into<String>, venue: impl Into<String>) -> Self {
        let now = Utc::now();
        RigPlan {
            meta: PlanMetadata {
                version: SCHEMA_VERSION.to_string(),
                production: production.into(),
                venue: venue.into(),
                created: now,
                modified: now,
            },
            settings: PlanSettings::default(),
            trusses: Vec::new(),
        }
    }

    /// Append a truss line and return its id
    pub fn add_truss(&mut self, truss: TrussRig) -> Uuid {
        let id = truss.id;
        self.trusses.push(truss);
        self.touch();
        id
    }

    /// Remove a truss line by id
    pub fn remove_truss(&mut self, id: &Uuid) -> Option<TrussRig> {
        let index = self.trusses.iter().position(|t| t.id == *id)?;
        self.touch();
        Some(self.trusses.remove(index))
    }

    /// Look up a truss line by id
    pub fn get_truss(&self, id: &Uuid) -> Option<&TrussRig> {
        self.trusses.iter().find(|t| t.id == *id)
    }

    /// Look up a truss line by id for editing
    pub fn get_truss_mut(&mut self, id: &Uuid) -> Option<&mut TrussRig> {
        self.trusses.iter_mut().find(|t| t.id == *id)
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of truss lines
    pub fn truss_count(&self) -> usize {
        self.trusses.len()
    }
}

/// Plan metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Production or show name
    pub production: String,

    /// Venue name
    pub venue: String,

    /// When the plan was created
    pub created: DateTime<Utc>,

    /// When the plan was last modified
    pub modified: DateTime<Utc>,
}

/// Plan-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Options for every truss that does not carry its own
    #[serde(default)]
    pub default_options: SolveOptions,
}

/// One truss line in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussRig {
    /// Stable identifier
    pub id: Uuid,

    /// User label (e.g. "Upstage", "FOH 1")
    pub label: String,

    /// Catalog id of the truss model
    pub truss_id: String,

    /// Fixtures hung on this truss
    #[serde(default)]
    pub fixtures: Vec<Fixture>,

    /// Pick-up points
    #[serde(default)]
    pub supports: Vec<Support>,

    /// Per-truss override of the plan defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SolveOptions>,
}

impl TrussRig {
    /// New truss line with no fixtures or supports
    pub fn new(label: impl Into<String>, truss_id: impl Into<String>) -> Self {
        TrussRig {
            id: Uuid::new_v4(),
            label: label.into(),
            truss_id: truss_id.into(),
            fixtures: Vec::new(),
            supports: Vec::new(),
            options: None,
        }
    }

    /// Add one fixture
    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixtures.push(fixture);
        self
    }

    /// Replace the supports
    pub fn with_supports(mut self, supports: Vec<Support>) -> Self {
        self.supports = supports;
        self
    }

    /// Override the plan defaults for this truss
    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Options in force for this truss
    pub fn effective_options<'a>(&'a self, settings: &'a PlanSettings) -> &'a SolveOptions {
        self.options.as_ref().unwrap_or(&settings.default_options)
    }
}

// =============================================================================
// SOLVING
// =============================================================================

/// Outcome of solving one truss line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrussOutcome {
    /// Solve and hoist selection both succeeded
    Solved {
        result: SolveResult,
        picks: Vec<HoistPick>,
    },
    /// The truss could not be analyzed
    Failed { error: RigError },
}

/// Report for one truss line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussReport {
    pub id: Uuid,
    pub label: String,
    pub truss_id: String,
    pub outcome: TrussOutcome,
}

impl TrussReport {
    /// Solved, within allowables, every support has a hoist and none lifts
    pub fn is_ok(&self) -> bool {
        match &self.outcome {
            TrussOutcome::Solved { result, picks } => {
                result.passes() && picks.iter().all(|p| p.hoist.is_some() && !p.is_uplift())
            }
            TrussOutcome::Failed { .. } => false,
        }
    }
}

/// Results for a whole plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub production: String,
    pub venue: String,
    pub trusses: Vec<TrussReport>,
}

impl PlanReport {
    /// Trusses that produced a result
    pub fn solved_count(&self) -> usize {
        self.trusses
            .iter()
            .filter(|t| matches!(t.outcome, TrussOutcome::Solved { .. }))
            .count()
    }

    /// Trusses that failed with an error
    pub fn failed_count(&self) -> usize {
        self.trusses.len() - self.solved_count()
    }

    /// Every truss is ok
    pub fn all_ok(&self) -> bool {
        self.trusses.iter().all(TrussReport::is_ok)
    }
}

fn solve_truss(
    rig: &TrussRig,
    settings: &PlanSettings,
    truss_catalog: &TrussCatalog,
    hoist_catalog: &HoistCatalog,
) -> RigResult<(SolveResult, Vec<HoistPick>)> {
    let truss = truss_catalog.get(&rig.truss_id)?;
    let options = rig.effective_options(settings);
    let result = solve_with_options(truss, &rig.fixtures, &rig.supports, options)?;
    let picks = suggest(&result.support_reactions_kg, &rig.supports, hoist_catalog)?;
    Ok((result, picks))
}

/// Solve every truss line in a plan.
///
/// A failing truss is reported with its error; the others are still solved.
pub fn solve_plan(
    plan: &RigPlan,
    truss_catalog: &TrussCatalog,
    hoist_catalog: &HoistCatalog,
) -> PlanReport {
    let trusses = plan
        .trusses
        .iter()
        .map(|rig| {
            let _span = debug_span!("truss", label = %rig.label).entered();
            let outcome = match solve_truss(rig, &plan.settings, truss_catalog, hoist_catalog) {
                Ok((result, picks)) => TrussOutcome::Solved { result, picks },
                Err(error) => {
                    warn!(truss = %rig.label, code = error.error_code(), "{}", error);
                    TrussOutcome::Failed { error }
                }
            };
            TrussReport {
                id: rig.id,
                label: rig.label.clone(),
                truss_id: rig.truss_id.clone(),
                outcome,
            }
        })
        .collect();

    PlanReport {
        production: plan.meta.production.clone(),
        venue: plan.meta.venue.clone(),
        trusses,
    }
}
