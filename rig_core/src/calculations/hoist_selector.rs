//! # Hoist Selection
//!
//! Maps each support reaction to the smallest catalog hoist whose rated
//! capacity covers it. No margin is added here; the dynamic factor is already
//! in the reactions.
//!
//! A reaction larger than every catalog unit is not an error: the pick is
//! returned with `hoist: None` and the load intact so the caller can flag it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{HoistCatalog, HoistCatalogEntry};
use crate::errors::{RigError, RigResult};
use crate::rigging::Support;

/// Hoist chosen for one support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoistPick {
    /// The support this pick serves
    pub support: Support,

    /// Load the hoist must carry (kg)
    pub required_kg: f64,

    /// Smallest adequate unit; `None` if nothing in the catalog is big enough
    pub hoist: Option<HoistCatalogEntry>,
}

impl HoistPick {
    /// True when the support pulls down on the truss.
    ///
    /// A chain hoist cannot push, so the truss would lift off this point.
    pub fn is_uplift(&self) -> bool {
        self.required_kg < 0.0
    }

    /// required / capacity, if a hoist was found
    pub fn utilization(&self) -> Option<f64> {
        self.hoist
            .as_ref()
            .map(|h| self.required_kg / h.capacity_kg)
    }
}

/// Pick a hoist for every reaction.
///
/// `reactions_kg[i]` belongs to `supports[i]`; the output keeps that order.
///
/// # Errors
///
/// [`RigError::InvalidInput`] if the two lists differ in length or a reaction
/// is not finite.
pub fn suggest(
    reactions_kg: &[f64],
    supports: &[Support],
    catalog: &HoistCatalog,
) -> RigResult<Vec<HoistPick>> {
    if reactions_kg.len() != supports.len() {
        return Err(RigError::invalid_input(
            "reactions_kg",
            reactions_kg.len().to_string(),
            format!("Expected one reaction per support ({})", supports.len()),
        ));
    }

    reactions_kg
        .iter()
        .zip(supports)
        .map(|(&required_kg, support)| {
            if !required_kg.is_finite() {
                return Err(RigError::invalid_input(
                    format!("reaction at '{}'", support.label),
                    required_kg.to_string(),
                    "Reaction must be a finite number",
                ));
            }

            let hoist = catalog.smallest_adequate(required_kg).cloned();
            if required_kg < 0.0 {
                warn!(
                    support = %support.label,
                    required_kg,
                    "uplift: support pulls down on the truss"
                );
            } else if hoist.is_none() {
                warn!(
                    support = %support.label,
                    required_kg,
                    largest_kg = ?catalog.largest().map(|h| h.capacity_kg),
                    "no catalog hoist covers this reaction"
                );
            }

            Ok(HoistPick {
                support: support.clone(),
                required_kg,
                hoist,
            })
        })
        .collect()
}
