//! `pipecut` library crate.
//!
//! The binary (`cut`) is a thin wrapper around this library so that:
//!
//! - offset resolution and cut arithmetic are testable without spawning processes
//! - the CLI and the TUI share one calculation pipeline

pub mod app;
pub mod calc;
pub mod catalog;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod jobs;
pub mod math;
pub mod report;
pub mod tui;
