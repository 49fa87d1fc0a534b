//! # Reference Catalogs
//!
//! Static, versioned reference data the solver and selector read but never
//! mutate:
//!
//! - [`truss_models`] - truss spans, rigidity and rated allowables
//! - [`hoists`] - lifting units and their rated capacities
//!
//! ## Example
//!
//! ```rust
//! use rig_core::catalog::{HoistCatalog, TrussCatalog};
//!
//! let truss = TrussCatalog::built_in().get("box290-8m").unwrap();
//! let hoist = HoistCatalog::built_in().smallest_adequate(300.0).unwrap();
//! println!("{} on {}", hoist.name, truss.name);
//! ```

pub mod hoists;
pub mod truss_models;

pub use hoists::{HoistCatalog, HoistCatalogEntry};
pub use truss_models::{TrussCatalog, TrussModel};
