//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in rigging calculations. These are
//! plain `f64` newtypes: JSON stays clean (just numbers) and there is no
//! runtime overhead.
//!
//! ## SI Units
//!
//! - Length: metres (m), millimetres (mm)
//! - Mass: kilograms (kg) - fixture weights and hoist capacities are quoted in kg
//! - Force: newtons (N)
//! - Angle: degrees, radians
//!
//! Mass and force are linked by standard gravity ([`STANDARD_GRAVITY`]).
//!
//! ## Example
//!
//! ```rust
//! use rig_core::units::{Kilograms, Meters, Millimeters, Newtons};
//!
//! let weight: Newtons = Kilograms(100.0).into();
//! assert!((weight.0 - 980.665).abs() < 1e-9);
//!
//! let sag: Millimeters = Meters(0.012).into();
//! assert!((sag.0 - 12.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Standard gravity (m/s²) used to turn kilograms into newtons
pub const STANDARD_GRAVITY: f64 = 9.80665;

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Mass and Force Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Weight of a mass under standard gravity
impl From<Kilograms> for Newtons {
    fn from(kg: Kilograms) -> Self {
        Newtons(kg.0 * STANDARD_GRAVITY)
    }
}

/// Mass equivalent of a force under standard gravity
impl From<Newtons> for Kilograms {
    fn from(n: Newtons) -> Self {
        Kilograms(n.0 / STANDARD_GRAVITY)
    }
}

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Newtons);
impl_arithmetic!(Degrees);
impl_arithmetic!(Radians);
