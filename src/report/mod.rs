//! Reporting: sixteenths rendering and formatted terminal output.

pub mod format;
pub mod fraction;

pub use format::*;
pub use fraction::*;

use crate::domain::{CutLength, CutResult};
use crate::math::{Inches, to_decimal_string};

/// A cut length in both display forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCut {
    pub label: &'static str,
    pub decimal: String,
    pub fraction: String,
    pub negative: bool,
}

pub fn render_cut(cut: &CutLength) -> RenderedCut {
    RenderedCut {
        label: cut.label,
        decimal: to_decimal_string(&cut.value, DECIMAL_PLACES),
        fraction: to_sixteenths_fraction(&cut.value),
        negative: cut.value < Inches::from_integer(0),
    }
}

pub fn render_result(result: &CutResult) -> Vec<RenderedCut> {
    result.lengths.iter().map(render_cut).collect()
}
