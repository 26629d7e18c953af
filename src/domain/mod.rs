//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - requested and resolved fittings (`FittingSpec`, `Connection`)
//! - calculation inputs/outputs (`CutRequest`, `CutResult`)
//! - catalog configuration (`CatalogConfig`)

pub mod types;

pub use types::*;
