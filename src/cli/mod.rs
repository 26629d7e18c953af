//! Command-line parsing for the `cut` calculator.
//!
//! Parsing stays separate from dispatch (`app`) and from the arithmetic.
//! Measurements are taken as text so fractions like `"12 1/2"` work; they
//! are converted by the app layer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_BUSHING_TYPE, FittingSpec, OffsetVariant};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cut", version, about = "PVC pipe cut-length calculator")]
pub struct Cli {
    /// Catalog CSV (overrides PIPECUT_CATALOG).
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Job book JSON (overrides PIPECUT_JOBS).
    #[arg(long, global = true)]
    pub jobs: Option<PathBuf>,

    /// Session offset overrides JSON.
    #[arg(long, global = true)]
    pub overrides: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pipe between two fittings: C2C - offset A - offset B.
    Standard(StandardArgs),
    /// Two pipes around a lay-in fitting.
    LayIn(LayInArgs),
    /// Pipe from A through a bushing into B.
    Bushing(BushingArgs),
    /// List available sizes per fitting type.
    Sizes,
    /// Edit catalog rows.
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Inspect recorded jobs.
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Launch the interactive TUI (the default with no arguments).
    Tui,
}

/// The two end fittings shared by every cut.
#[derive(Debug, Args, Clone)]
pub struct EndFittings {
    /// Fitting type at end A.
    #[arg(long)]
    pub a_type: String,

    /// Fitting size at end A (e.g. 2, 1.5, 2x2x1).
    #[arg(long)]
    pub a_size: String,

    /// Use the alternate offset for A.
    #[arg(long)]
    pub a_alt: bool,

    /// Fitting type at end B.
    #[arg(long)]
    pub b_type: String,

    #[arg(long)]
    pub b_size: String,

    /// Use the alternate offset for B.
    #[arg(long)]
    pub b_alt: bool,
}

impl EndFittings {
    pub fn a(&self) -> FittingSpec {
        FittingSpec::new(&self.a_type, &self.a_size).with_variant(variant(self.a_alt))
    }

    pub fn b(&self) -> FittingSpec {
        FittingSpec::new(&self.b_type, &self.b_size).with_variant(variant(self.b_alt))
    }
}

/// Options shared by every calculation.
#[derive(Debug, Args, Clone)]
pub struct CalcOptions {
    /// Take 1/16" off every cut.
    #[arg(long)]
    pub shave: bool,

    /// Record the result under this job name.
    #[arg(long)]
    pub job: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct StandardArgs {
    #[command(flatten)]
    pub ends: EndFittings,

    /// Center-to-center measurement (inches).
    #[arg(long)]
    pub c2c: String,

    #[command(flatten)]
    pub options: CalcOptions,
}

#[derive(Debug, Args, Clone)]
pub struct LayInArgs {
    #[command(flatten)]
    pub ends: EndFittings,

    /// Lay-in fitting type.
    #[arg(long)]
    pub layin_type: String,

    #[arg(long)]
    pub layin_size: String,

    /// Use the alternate offset for the lay-in fitting.
    #[arg(long)]
    pub layin_alt: bool,

    /// Overall center-to-center, A to B.
    #[arg(long)]
    pub overall: String,

    /// Center-to-center, A to the lay-in fitting.
    #[arg(long)]
    pub layin: String,

    #[command(flatten)]
    pub options: CalcOptions,
}

impl LayInArgs {
    pub fn lay_in(&self) -> FittingSpec {
        FittingSpec::new(&self.layin_type, &self.layin_size).with_variant(variant(self.layin_alt))
    }
}

#[derive(Debug, Args, Clone)]
pub struct BushingArgs {
    #[command(flatten)]
    pub ends: EndFittings,

    /// Bushing size (e.g. 2x1.5).
    #[arg(long)]
    pub bushing_size: String,

    #[arg(long, default_value = DEFAULT_BUSHING_TYPE)]
    pub bushing_type: String,

    /// Bushing thickness; defaults to the bushing's alternate offset.
    #[arg(long)]
    pub thickness: Option<String>,

    /// Center-to-center, A to B.
    #[arg(long)]
    pub c2c: String,

    #[command(flatten)]
    pub options: CalcOptions,
}

impl BushingArgs {
    pub fn bushing(&self) -> FittingSpec {
        FittingSpec::new(&self.bushing_type, &self.bushing_size)
    }
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Append a row and save the catalog.
    Add {
        #[arg(long = "type")]
        fitting_type: String,
        #[arg(long)]
        size: String,
        /// Primary offset (decimal, fraction or mixed number).
        #[arg(long)]
        offset: String,
        /// Alternate offset.
        #[arg(long)]
        alt_offset: Option<String>,
    },
    /// Remove a row and save the catalog.
    Remove {
        #[arg(long = "type")]
        fitting_type: String,
        #[arg(long)]
        size: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    List,
    Show { name: String },
    Remove { name: String },
}

fn variant(alt: bool) -> OffsetVariant {
    if alt {
        OffsetVariant::Secondary
    } else {
        OffsetVariant::Primary
    }
}
