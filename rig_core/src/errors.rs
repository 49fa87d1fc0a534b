//! # Error Types
//!
//! Structured error types for rig_core. Every failure carries enough context
//! (which field, which support, which file) for a caller to point the user at
//! the offending input.
//!
//! Errors fall into three classes:
//!
//! - **Configuration**: the caller handed the solver something it cannot
//!   meaningfully analyze (unknown truss, fewer than two supports, two supports
//!   at the same position, a position that is not a finite number).
//! - **Numerical**: the assembled stiffness system is singular.
//! - **I/O**: rig plan and catalog files.
//!
//! A hoist that is too small for a reaction is *not* an error; see
//! [`HoistPick`](crate::calculations::hoist_selector::HoistPick).
//!
//! ## Example
//!
//! ```rust
//! use rig_core::errors::{RigError, RigResult};
//!
//! fn validate_length(length_m: f64) -> RigResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(RigError::invalid_input(
//!             "length_m",
//!             length_m.to_string(),
//!             "Truss length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rig_core operations
pub type RigResult<T> = Result<T, RigError>;

/// Structured error type for solver, selector and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum RigError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Truss model id not present in the catalog
    #[error("Truss model not found: '{truss_id}'")]
    TrussNotFound { truss_id: String },

    /// A beam needs at least two supports to be statically meaningful
    #[error("At least two supports are required, got {count}")]
    TooFewSupports { count: usize },

    /// Two supports share a position, leaving the reactions undefined
    #[error("Supports '{first}' and '{second}' are both at x = {x_m} m")]
    DuplicateSupports {
        first: String,
        second: String,
        x_m: f64,
    },

    /// A fixture or support position that cannot be clamped onto the truss
    #[error("Invalid position for {item}: {value}")]
    InvalidPosition { item: String, value: String },

    /// The reduced stiffness system could not be solved
    #[error("Stiffness system is singular: {reason}")]
    SingularSystem { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl RigError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RigError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a TrussNotFound error
    pub fn truss_not_found(truss_id: impl Into<String>) -> Self {
        RigError::TrussNotFound {
            truss_id: truss_id.into(),
        }
    }

    /// Create an InvalidPosition error
    pub fn invalid_position(item: impl Into<String>, value: f64) -> Self {
        RigError::InvalidPosition {
            item: item.into(),
            value: value.to_string(),
        }
    }

    /// Create a SingularSystem error
    pub fn singular(reason: impl Into<String>) -> Self {
        RigError::SingularSystem {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RigError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for caller mistakes in the truss configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RigError::InvalidInput { .. }
                | RigError::TrussNotFound { .. }
                | RigError::TooFewSupports { .. }
                | RigError::DuplicateSupports { .. }
                | RigError::InvalidPosition { .. }
        )
    }

    /// True when the linear solve itself failed
    pub fn is_numerical_failure(&self) -> bool {
        matches!(self, RigError::SingularSystem { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            RigError::InvalidInput { .. } => "INVALID_INPUT",
            RigError::TrussNotFound { .. } => "TRUSS_NOT_FOUND",
            RigError::TooFewSupports { .. } => "TOO_FEW_SUPPORTS",
            RigError::DuplicateSupports { .. } => "DUPLICATE_SUPPORTS",
            RigError::InvalidPosition { .. } => "INVALID_POSITION",
            RigError::SingularSystem { .. } => "SINGULAR_SYSTEM",
            RigError::FileError { .. } => "FILE_ERROR",
            RigError::SerializationError { .. } => "SERIALIZATION_ERROR",
            RigError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        RigError::SerializationError {
            reason: err.to_string(),
        }
    }
}
