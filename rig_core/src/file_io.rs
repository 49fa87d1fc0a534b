//! # File I/O Module
//!
//! Handles rig plan and catalog files:
//! - **Atomic saves**: Write to .tmp, verify, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//! - **Catalog loading**: Generic JSON reads with path context in errors
//!
//! ## File Format
//!
//! Plans are saved as `.rig` files containing pretty-printed JSON. Catalog
//! files are plain JSON arrays.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rig_core::file_io::{load_plan, save_plan};
//! use rig_core::plan::RigPlan;
//! use std::path::Path;
//!
//! let plan = RigPlan::new("Summer Tour", "Arena North");
//! let path = Path::new("summer.rig");
//!
//! save_plan(&plan, path).unwrap();
//! let loaded = load_plan(path).unwrap();
//! assert_eq!(loaded.meta.production, "Summer Tour");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{RigError, RigResult};
use crate::plan::{RigPlan, SCHEMA_VERSION};

/// Read a whole file into a string
fn read_to_string(path: &Path) -> RigResult<String> {
    let mut file = File::open(path)
        .map_err(|e| RigError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| RigError::file_error("read", path.display().to_string(), e.to_string()))?;

    Ok(contents)
}

/// Read and deserialize a JSON file.
///
/// Parse failures name the file in the [`RigError::SerializationError`].
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> RigResult<T> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| RigError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save a rig plan with an atomic write.
///
/// 1. Serialize plan to JSON
/// 2. Write to a temporary file (.rig.tmp)
/// 3. Sync and parse the temporary file back
/// 4. Rename .tmp to the final path (atomic on most filesystems)
///
/// A crash at any point leaves either the old file or the new one, never a
/// truncated mix.
pub fn save_plan(plan: &RigPlan, path: &Path) -> RigResult<()> {
    let json = serde_json::to_string_pretty(plan).map_err(|e| RigError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("rig.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        RigError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        RigError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        RigError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    if let Err(e) = read_json_file::<RigPlan>(&tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        RigError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a rig plan and check its schema version.
pub fn load_plan(path: &Path) -> RigResult<RigPlan> {
    let plan: RigPlan = read_json_file(path)?;
    validate_version(&plan.meta.version)?;
    Ok(plan)
}

/// Accept files whose major version matches; for 0.x also reject newer minors.
fn validate_version(file_version: &str) -> RigResult<()> {
    let mismatch = || RigError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(|p| p.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| mismatch())?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
