//! Truss Model Catalog
//!
//! Reference data for the truss types a rig plan can hang fixtures from.
//! Each [`TrussModel`] describes one assembled truss line: its span, its
//! self-weight, its flexural rigidity and the manufacturer-rated safe envelope
//! for bending moment and deflection.
//!
//! The built-in catalog holds generic aluminium box and triangle sections with
//! indicative properties. Productions load the manufacturer's published tables
//! through [`TrussCatalog::from_json_file`] instead.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{RigError, RigResult};
use crate::file_io::read_json_file;

/// Immutable reference data for one truss type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussModel {
    /// Catalog key (e.g. "box290-8m")
    pub id: String,

    /// Human readable name for reports
    pub name: String,

    /// Span of the assembled truss (m)
    pub length_m: f64,

    /// Self-weight per metre (kg/m)
    #[serde(default)]
    pub mass_per_m_kg: f64,

    /// Flexural rigidity E·I (N·m²)
    pub ei_nm2: f64,

    /// Rated allowable bending moment (N·m)
    pub max_moment_nm: f64,

    /// Rated allowable deflection (m)
    pub max_deflection_m: f64,
}

impl TrussModel {
    /// Total self-weight of the truss (kg)
    pub fn self_weight_kg(&self) -> f64 {
        self.mass_per_m_kg * self.length_m
    }

    /// Validate that the model is physically meaningful
    pub fn validate(&self) -> RigResult<()> {
        if !self.length_m.is_finite() || self.length_m <= 0.0 {
            return Err(RigError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                format!("Truss '{}' must have a positive length", self.id),
            ));
        }
        if !self.ei_nm2.is_finite() || self.ei_nm2 <= 0.0 {
            return Err(RigError::invalid_input(
                "ei_nm2",
                self.ei_nm2.to_string(),
                format!("Truss '{}' must have a positive flexural rigidity", self.id),
            ));
        }
        if !self.mass_per_m_kg.is_finite() || self.mass_per_m_kg < 0.0 {
            return Err(RigError::invalid_input(
                "mass_per_m_kg",
                self.mass_per_m_kg.to_string(),
                "Self-weight cannot be negative",
            ));
        }
        if !(self.max_moment_nm > 0.0) {
            return Err(RigError::invalid_input(
                "max_moment_nm",
                self.max_moment_nm.to_string(),
                "Allowable moment must be positive",
            ));
        }
        if !(self.max_deflection_m > 0.0) {
            return Err(RigError::invalid_input(
                "max_deflection_m",
                self.max_deflection_m.to_string(),
                "Allowable deflection must be positive",
            ));
        }
        Ok(())
    }
}

/// Builder for the built-in entries: a section family at a given span.
///
/// Deflection allowable is span/200.
fn section(
    id_prefix: &str,
    name: &str,
    length_m: f64,
    mass_per_m_kg: f64,
    ei_nm2: f64,
    max_moment_nm: f64,
) -> TrussModel {
    TrussModel {
        id: format!("{}-{}m", id_prefix, length_m),
        name: format!("{} {} m", name, length_m),
        length_m,
        mass_per_m_kg,
        ei_nm2,
        max_moment_nm,
        max_deflection_m: length_m / 200.0,
    }
}

static BUILT_IN: Lazy<TrussCatalog> = Lazy::new(|| {
    let mut models = Vec::new();
    for length in [4.0, 6.0, 8.0, 10.0, 12.0] {
        models.push(section("box290", "Box 290", length, 7.2, 1.8e6, 14_000.0));
    }
    for length in [8.0, 12.0, 16.0] {
        models.push(section("box400", "Box 400", length, 9.8, 4.6e6, 30_000.0));
    }
    for length in [4.0, 6.0, 8.0] {
        models.push(section("tri290", "Triangle 290", length, 5.4, 0.9e6, 8_500.0));
    }
    TrussCatalog { models }
});

/// Collection of truss models, looked up by id.
///
/// Serializes as a plain JSON array; every model is validated on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrussModel>", into = "Vec<TrussModel>")]
pub struct TrussCatalog {
    models: Vec<TrussModel>,
}

impl TryFrom<Vec<TrussModel>> for TrussCatalog {
    type Error = RigError;

    fn try_from(models: Vec<TrussModel>) -> RigResult<Self> {
        Self::new(models)
    }
}

impl From<TrussCatalog> for Vec<TrussModel> {
    fn from(catalog: TrussCatalog) -> Self {
        catalog.models
    }
}

impl TrussCatalog {
    /// The catalog shipped with the crate
    pub fn built_in() -> &'static TrussCatalog {
        &BUILT_IN
    }

    /// Create a catalog from explicit models, validating each one
    pub fn new(models: Vec<TrussModel>) -> RigResult<Self> {
        for model in &models {
            model.validate()?;
        }
        Ok(Self { models })
    }

    /// Load a catalog from a JSON array of truss models
    pub fn from_json_file(path: &Path) -> RigResult<Self> {
        let models: Vec<TrussModel> = read_json_file(path)?;
        Self::new(models)
    }

    /// Look up a model by id
    ///
    /// Returns [`RigError::TrussNotFound`] for ids the catalog does not know.
    pub fn get(&self, id: &str) -> RigResult<&TrussModel> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| RigError::truss_not_found(id))
    }

    /// All models in catalog order
    pub fn models(&self) -> &[TrussModel] {
        &self.models
    }

    /// Number of models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True when the catalog holds no models
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
