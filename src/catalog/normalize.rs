//! Size and offset normalization.
//!
//! Catalog sizes arrive in several shapes: plain numbers (`2`, `2.0`, `1.5`),
//! reducing-fitting composites (`2x2x1`, `1.5X1.5X0.5`) and the occasional
//! free-text label. Two sizes match only when their canonical strings are
//! equal; there is no prefix or substring matching.

use crate::error::CutError;
use crate::math::{Inches, is_non_negative, parse_rational};

/// Canonical comparison form of a size.
///
/// - blank input -> `""` (never matches a catalog row)
/// - composites containing `x` -> trimmed and lower-cased, otherwise untouched
/// - numbers -> integer form when integral (`"2.0"` -> `"2"`), else the
///   shortest decimal form (`"1.50"` -> `"1.5"`)
/// - anything else -> trimmed and lower-cased
pub fn normalize_size(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    let lower = s.to_lowercase();
    if lower.contains('x') {
        return lower;
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => render_number(v),
        _ => lower,
    }
}

fn render_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    format!("{v}")
}

/// Parse a raw offset cell.
///
/// Blank cells mean "no value" (`Ok(None)`), which is not the same as zero.
/// Decimals are tried first, then `n/d` fractions and mixed numbers. Anything
/// unparseable, a zero denominator, or a negative offset is
/// [`CutError::InvalidOffsetFormat`].
pub fn parse_offset_value(raw: Option<&str>) -> Result<Option<Inches>, CutError> {
    let Some(raw) = raw else { return Ok(None) };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    match parse_rational(raw) {
        Some(v) if is_non_negative(&v) => Ok(Some(v)),
        _ => Err(CutError::InvalidOffsetFormat {
            value: raw.to_string(),
            context: None,
        }),
    }
}
