//! Hoist Capacity Catalog
//!
//! Static reference list of lifting units and their rated safe working loads.
//! The catalog keeps its entries sorted ascending by capacity so selection is
//! a single forward scan.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{RigError, RigResult};
use crate::file_io::read_json_file;

/// One lifting unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoistCatalogEntry {
    /// Display name (e.g. "Chain hoist 500 kg")
    pub name: String,

    /// Rated safe working load (kg)
    pub capacity_kg: f64,
}

impl HoistCatalogEntry {
    /// Create a catalog entry
    pub fn new(name: impl Into<String>, capacity_kg: f64) -> Self {
        Self {
            name: name.into(),
            capacity_kg,
        }
    }
}

static BUILT_IN: Lazy<HoistCatalog> = Lazy::new(|| {
    HoistCatalog::sorted(vec![
        HoistCatalogEntry::new("Chain hoist 250 kg", 250.0),
        HoistCatalogEntry::new("Chain hoist 320 kg", 320.0),
        HoistCatalogEntry::new("Chain hoist 500 kg", 500.0),
        HoistCatalogEntry::new("Chain hoist 1000 kg", 1000.0),
        HoistCatalogEntry::new("Chain hoist 2000 kg", 2000.0),
    ])
});

/// Hoist catalog, always sorted ascending by `capacity_kg`.
///
/// Serializes as a plain JSON array; deserializing validates and re-sorts, so
/// files may list units in any order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HoistCatalogEntry>", into = "Vec<HoistCatalogEntry>")]
pub struct HoistCatalog {
    entries: Vec<HoistCatalogEntry>,
}

impl TryFrom<Vec<HoistCatalogEntry>> for HoistCatalog {
    type Error = RigError;

    /// Entries with a non-positive or non-finite capacity are rejected.
    fn try_from(entries: Vec<HoistCatalogEntry>) -> RigResult<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if !entry.capacity_kg.is_finite() || entry.capacity_kg <= 0.0 {
                return Err(RigError::invalid_input(
                    format!("hoists[{}].capacity_kg", i),
                    entry.capacity_kg.to_string(),
                    format!("Hoist '{}' must have a positive capacity", entry.name),
                ));
            }
        }
        Ok(Self::sorted(entries))
    }
}

impl From<HoistCatalog> for Vec<HoistCatalogEntry> {
    fn from(catalog: HoistCatalog) -> Self {
        catalog.entries
    }
}

impl HoistCatalog {
    /// The catalog shipped with the crate
    pub fn built_in() -> &'static HoistCatalog {
        &BUILT_IN
    }

    fn sorted(mut entries: Vec<HoistCatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.capacity_kg.total_cmp(&b.capacity_kg));
        Self { entries }
    }

    /// Load a catalog from a JSON array of entries
    pub fn from_json_file(path: &Path) -> RigResult<Self> {
        let entries: Vec<HoistCatalogEntry> = read_json_file(path)?;
        Self::try_from(entries)
    }

    /// Smallest unit whose capacity covers `required_kg` (inclusive)
    pub fn smallest_adequate(&self, required_kg: f64) -> Option<&HoistCatalogEntry> {
        self.entries.iter().find(|e| e.capacity_kg >= required_kg)
    }

    /// Largest unit in the catalog
    pub fn largest(&self) -> Option<&HoistCatalogEntry> {
        self.entries.last()
    }

    /// Entries in ascending capacity order
    pub fn entries(&self) -> &[HoistCatalogEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
