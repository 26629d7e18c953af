//! Input/output helpers.
//!
//! - catalog CSV ingest + write-back (`catalog`)
//! - session override JSON (`overrides`)
//! - job book JSON (`jobs`)

pub mod catalog;
pub mod jobs;
pub mod overrides;

pub use catalog::*;
pub use jobs::*;
pub use overrides::*;
