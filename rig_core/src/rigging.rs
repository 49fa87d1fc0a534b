//! # Rigging Inputs
//!
//! The plain data the solver consumes: fixtures hung on the truss, the support
//! (hoist) points holding it up, and the options controlling the analysis.
//!
//! Positions are measured in metres from the left end of the truss. Before use
//! every position is clamped into `[0, length_m]`; a position that is not a
//! finite number cannot be clamped meaningfully and is rejected.
//!
//! ## Example
//!
//! ```rust
//! use rig_core::rigging::{Fixture, SolveOptions, Support};
//!
//! let fixtures = vec![
//!     Fixture::new(2.0, 18.5).with_qty(4).with_name("Wash"),
//!     Fixture::new(4.0, 40.0).with_name("Spot"),
//! ];
//! let supports = vec![Support::new(0.8, "SL"), Support::new(7.2, "SR")];
//! let options = SolveOptions {
//!     dynamic_factor: 1.2,
//!     ..Default::default()
//! };
//! assert_eq!(fixtures[0].total_weight_kg(), 74.0);
//! assert!(options.validate().is_ok());
//! # let _ = supports;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{RigError, RigResult};
use crate::units::{Degrees, Radians};

/// Default discretization of the beam
pub const DEFAULT_ELEMENTS: usize = 32;

/// Upper bound on the discretization accepted by the solver
pub const MAX_ELEMENTS: usize = 1000;

// =============================================================================
// FIXTURE
// =============================================================================

/// A point load hung on the truss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Position from the left end (m)
    pub x_m: f64,

    /// Weight of one unit (kg)
    pub weight_kg: f64,

    /// Number of units hung at this position
    #[serde(default = "default_qty")]
    pub qty: u32,

    /// Optional name for reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_qty() -> u32 {
    1
}

impl Fixture {
    /// Create a single fixture
    pub fn new(x_m: f64, weight_kg: f64) -> Self {
        Self {
            x_m,
            weight_kg,
            qty: 1,
            name: None,
        }
    }

    /// Set the multiplicity
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    /// Set the report name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Combined static weight `weight_kg * qty` (kg)
    pub fn total_weight_kg(&self) -> f64 {
        self.weight_kg * self.qty as f64
    }

    /// Identifier used in error messages
    pub fn describe(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("fixture '{}'", name),
            None => format!("fixture #{}", index),
        }
    }
}

// =============================================================================
// SUPPORT
// =============================================================================

/// A pick-up point restraining the truss vertically (hoist or anchor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Position from the left end (m)
    pub x_m: f64,

    /// Label used in reports and hoist picks (e.g. "SL", "M3")
    pub label: String,
}

impl Support {
    /// Create a support
    pub fn new(x_m: f64, label: impl Into<String>) -> Self {
        Self {
            x_m,
            label: label.into(),
        }
    }
}

/// Clamp a position onto the truss.
///
/// Non-finite positions are rejected with [`RigError::InvalidPosition`].
pub fn clamp_position(x_m: f64, length_m: f64, item: impl Into<String>) -> RigResult<f64> {
    if !x_m.is_finite() {
        return Err(RigError::invalid_position(item, x_m));
    }
    Ok(x_m.clamp(0.0, length_m))
}

// =============================================================================
// SOLVE OPTIONS
// =============================================================================

/// Analysis options.
///
/// Missing fields in JSON take their defaults, so a plan can override just the
/// tilt or the dynamic factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Tilt of the truss from horizontal (degrees, -90..=90)
    pub tilt_deg: f64,

    /// Number of beam elements along the span
    pub n_elements: usize,

    /// Multiplier (>= 1) applied to every fixture load
    pub dynamic_factor: f64,

    /// Add the motor self-weight as a point load at each support
    pub include_motor_weight_on_truss: bool,

    /// Weight of one motor (kg)
    pub motor_weight_kg_each: f64,

    /// Add the truss self-weight as a uniform load
    pub include_self_weight: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tilt_deg: 0.0,
            n_elements: DEFAULT_ELEMENTS,
            dynamic_factor: 1.0,
            include_motor_weight_on_truss: false,
            motor_weight_kg_each: 0.0,
            include_self_weight: false,
        }
    }
}

impl SolveOptions {
    /// Validate option ranges
    pub fn validate(&self) -> RigResult<()> {
        validate_tilt(self.tilt_deg)?;
        validate_elements(self.n_elements)?;
        validate_dynamic_factor(self.dynamic_factor)?;
        validate_motor_weight(self.motor_weight_kg_each)
    }

    /// Fraction of a gravity load acting transverse to the truss
    pub fn transverse_factor(&self) -> f64 {
        transverse_factor(self.tilt_deg)
    }
}

fn validate_dynamic_factor(dynamic_factor: f64) -> RigResult<()> {
    if !dynamic_factor.is_finite() || dynamic_factor < 1.0 {
        return Err(RigError::invalid_input(
            "dynamic_factor",
            dynamic_factor.to_string(),
            "Dynamic factor must be a finite number >= 1",
        ));
    }
    Ok(())
}

fn validate_motor_weight(motor_weight_kg_each: f64) -> RigResult<()> {
    if !motor_weight_kg_each.is_finite() || motor_weight_kg_each < 0.0 {
        return Err(RigError::invalid_input(
            "motor_weight_kg_each",
            motor_weight_kg_each.to_string(),
            "Motor weight cannot be negative",
        ));
    }
    Ok(())
}

fn validate_tilt(tilt_deg: f64) -> RigResult<()> {
    if !tilt_deg.is_finite() || tilt_deg.abs() > 90.0 {
        return Err(RigError::invalid_input(
            "tilt_deg",
            tilt_deg.to_string(),
            "Tilt must be between -90 and 90 degrees",
        ));
    }
    Ok(())
}

fn validate_elements(n_elements: usize) -> RigResult<()> {
    if n_elements == 0 || n_elements > MAX_ELEMENTS {
        return Err(RigError::invalid_input(
            "n_elements",
            n_elements.to_string(),
            format!("Element count must be between 1 and {}", MAX_ELEMENTS),
        ));
    }
    Ok(())
}

/// `cos(tilt)`, exactly zero for a vertical truss.
pub fn transverse_factor(tilt_deg: f64) -> f64 {
    if tilt_deg.abs() >= 90.0 {
        return 0.0;
    }
    let radians: Radians = Degrees(tilt_deg).into();
    radians.0.cos().max(0.0)
}

// =============================================================================
// LOAD SET AND GEOMETRY
// =============================================================================

/// Everything that loads the truss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSet {
    /// Fixtures hung on the truss
    pub fixtures: Vec<Fixture>,

    /// Multiplier (>= 1) applied to fixture loads
    pub dynamic_factor: f64,

    /// Add motor self-weight at each support
    pub include_motor_weight_on_truss: bool,

    /// Weight of one motor (kg)
    pub motor_weight_kg_each: f64,

    /// Add the truss self-weight
    pub include_self_weight: bool,
}

impl LoadSet {
    /// Split the load-related options out of [`SolveOptions`]
    pub fn from_options(fixtures: Vec<Fixture>, options: &SolveOptions) -> Self {
        Self {
            fixtures,
            dynamic_factor: options.dynamic_factor,
            include_motor_weight_on_truss: options.include_motor_weight_on_truss,
            motor_weight_kg_each: options.motor_weight_kg_each,
            include_self_weight: options.include_self_weight,
        }
    }

    /// Validate the dynamic factor and motor weight
    pub fn validate(&self) -> RigResult<()> {
        validate_dynamic_factor(self.dynamic_factor)?;
        validate_motor_weight(self.motor_weight_kg_each)
    }

    /// Motor weight actually applied per support (kg)
    pub fn motor_weight_kg(&self) -> f64 {
        if self.include_motor_weight_on_truss {
            self.motor_weight_kg_each
        } else {
            0.0
        }
    }
}

/// Where the truss is held and how it is oriented and meshed.
///
/// Supports and fixtures always get their own mesh nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Support points (input order is preserved in the results)
    pub supports: Vec<Support>,

    /// Tilt from horizontal (degrees)
    pub tilt_deg: f64,

    /// Number of beam elements along the span
    pub n_elements: usize,
}

impl Geometry {
    /// Split the geometry-related options out of [`SolveOptions`]
    pub fn from_options(supports: Vec<Support>, options: &SolveOptions) -> Self {
        Self {
            supports,
            tilt_deg: options.tilt_deg,
            n_elements: options.n_elements,
        }
    }

    /// Validate support count, tilt and element count
    pub fn validate(&self) -> RigResult<()> {
        if self.supports.len() < 2 {
            return Err(RigError::TooFewSupports {
                count: self.supports.len(),
            });
        }
        validate_tilt(self.tilt_deg)?;
        validate_elements(self.n_elements)
    }
}
