//! Shared calculation workflow used by both the CLI and the TUI.
//!
//! load catalog (+ overrides) -> resolve fittings -> apply formula -> optional shave
//!
//! The front-ends only collect inputs and present the output.

use chrono::Local;
use num_rational::Ratio;
use tracing::info;

use crate::calc::evaluate;
use crate::catalog::{Catalog, Resolver, SessionOverrides};
use crate::domain::{CatalogConfig, CutRequest, CutResult, FittingRole, FittingSpec};
use crate::error::{AppError, CutError};
use crate::io::{load_catalog, read_overrides_json};
use crate::jobs::{JobEntry, RecordedCut};
use crate::math::Inches;
use crate::report::{format_request, render_result};

use super::settings::Settings;

/// Amount removed from every cut when shaving is requested (1/16").
pub const SHAVE: Inches = Ratio::new_raw(1, 16);

/// Everything needed to resolve fittings.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub catalog: Catalog,
    pub config: CatalogConfig,
    pub overrides: SessionOverrides,
}

impl Workspace {
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.catalog, &self.config).with_overrides(&self.overrides)
    }
}

/// Load the catalog and any override file named in the settings.
pub fn load_workspace(settings: &Settings) -> Result<Workspace, AppError> {
    let loaded = load_catalog(&settings.catalog_path, &settings.catalog)?;
    if loaded.catalog.is_empty() {
        return Err(AppError::new(
            3,
            format!("Catalog '{}' has no usable rows.", settings.catalog_path.display()),
        ));
    }

    let overrides = match &settings.overrides_path {
        Some(path) => read_overrides_json(path)?,
        None => SessionOverrides::new(),
    };

    Ok(Workspace {
        catalog: loaded.catalog,
        config: settings.catalog.clone(),
        overrides,
    })
}

/// Unresolved calculation inputs as collected by a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcInput {
    Standard {
        a: FittingSpec,
        b: FittingSpec,
        c2c: Inches,
    },
    LayIn {
        a: FittingSpec,
        lay_in: FittingSpec,
        b: FittingSpec,
        c2c_overall: Inches,
        c2c_lay_in: Inches,
    },
    Bushing {
        a: FittingSpec,
        bushing: FittingSpec,
        b: FittingSpec,
        c2c: Inches,
        /// Falls back to the bushing's secondary offset when absent.
        thickness: Option<Inches>,
    },
}

/// Resolved request and its cut lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcOutput {
    pub request: CutRequest,
    pub result: CutResult,
    pub shaved: bool,
}

/// Resolve every fitting into a concrete request.
pub fn resolve_request(resolver: &Resolver<'_>, input: &CalcInput) -> Result<CutRequest, CutError> {
    let request = match input {
        CalcInput::Standard { a, b, c2c } => CutRequest::Standard {
            a: resolver.connection(FittingRole::A, a)?,
            b: resolver.connection(FittingRole::B, b)?,
            c2c: *c2c,
        },
        CalcInput::LayIn {
            a,
            lay_in,
            b,
            c2c_overall,
            c2c_lay_in,
        } => CutRequest::LayIn {
            a: resolver.connection(FittingRole::A, a)?,
            lay_in: resolver.connection(FittingRole::LayIn, lay_in)?,
            b: resolver.connection(FittingRole::B, b)?,
            c2c_overall: *c2c_overall,
            c2c_lay_in: *c2c_lay_in,
        },
        CalcInput::Bushing {
            a,
            bushing,
            b,
            c2c,
            thickness,
        } => CutRequest::Bushing {
            a: resolver.connection(FittingRole::A, a)?,
            bushing: resolver.connection(FittingRole::Bushing, bushing)?,
            b: resolver.connection(FittingRole::B, b)?,
            c2c: *c2c,
            thickness: resolver.bushing_thickness(bushing, *thickness)?,
        },
    };
    Ok(request)
}

/// Resolve, calculate and optionally shave.
pub fn run_calculation(resolver: &Resolver<'_>, input: &CalcInput, shave: bool) -> Result<CalcOutput, CutError> {
    let request = resolve_request(resolver, input)?;
    let result = evaluate(&request)?;
    let result = if shave {
        result.less(SHAVE).ok_or_else(|| CutError::OutOfRange {
            calculation: request.kind().display_name().to_string(),
        })?
    } else {
        result
    };
    info!(kind = ?request.kind(), shaved = shave, "calculation complete");
    Ok(CalcOutput {
        request,
        result,
        shaved: shave,
    })
}

/// Snapshot an output for the job book, exactly as displayed.
pub fn job_entry(output: &CalcOutput) -> JobEntry {
    JobEntry {
        recorded_at: Local::now(),
        kind: output.request.kind(),
        summary: format_request(&output.request),
        cuts: render_result(&output.result)
            .into_iter()
            .map(|r| RecordedCut {
                label: r.label.to_string(),
                decimal: r.decimal,
                fraction: r.fraction,
            })
            .collect(),
        shaved: output.shaved,
    }
}
