//! Sixteenths-of-an-inch rendering.
//!
//! A length is rounded to the nearest 1/16 (ties go up, toward positive
//! infinity), split into a whole part and a remainder with floor semantics, and
//! the remainder is reduced: `2.5 -> "2 1/2"`, `2.3125 -> "2 5/16"`,
//! `3.0 -> "3"`.
//!
//! Floor semantics keep the remainder in `0..16` for negative lengths too, so
//! `-0.5` renders as `"-1 1/2"` (that is `-1 + 1/2`). [`parse_sixteenths`]
//! reads the string back with the same meaning.

use num_rational::Ratio;
use num_traits::CheckedAdd;

use crate::math::{Inches, from_f64, parse_rational, round_half_up};

pub const SIXTEENTHS: i64 = 16;

/// Render an exact length as a reduced mixed number of sixteenths.
pub fn to_sixteenths_fraction(length: &Inches) -> String {
    let n16 = round_half_up(length, SIXTEENTHS);
    let whole = n16.div_euclid(i128::from(SIXTEENTHS));
    // Always in 0..16.
    let remainder = n16.rem_euclid(i128::from(SIXTEENTHS)) as i64;

    if remainder == 0 {
        return whole.to_string();
    }
    let reduced = Ratio::new(remainder, SIXTEENTHS);
    format!("{whole} {}/{}", reduced.numer(), reduced.denom())
}

/// Float entry point; the value is first bounded to a denominator of 1000 so
/// binary noise does not shift a tie.
pub fn to_sixteenths_fraction_f64(length: f64) -> Option<String> {
    from_f64(length).map(|v| to_sixteenths_fraction(&v))
}

/// Parse a rendered fraction back to its value (`"-1 1/2"` is `-1/2`).
pub fn parse_sixteenths(rendered: &str) -> Option<Inches> {
    let mut parts = rendered.split_whitespace();
    let whole = parts.next()?;
    let whole: i64 = whole.parse().ok()?;
    let remainder = match parts.next() {
        Some(frac) => parse_rational(frac)?,
        None => Inches::from_integer(0),
    };
    if parts.next().is_some() || remainder < Inches::from_integer(0) || remainder >= Inches::from_integer(1) {
        return None;
    }
    Inches::from_integer(whole).checked_add(&remainder)
}
