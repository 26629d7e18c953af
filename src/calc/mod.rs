//! Cut-length arithmetic.
//!
//! Offsets arrive already resolved; everything here is a pure function of
//! exact inch values. Results are never clamped, so a negative length reaches
//! the caller as-is.

pub mod formulas;
pub mod measurement;

pub use formulas::*;
pub use measurement::*;
