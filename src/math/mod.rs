//! Exact rational helpers for inch lengths.

pub mod rational;

pub use rational::*;
