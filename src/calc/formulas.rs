//! The three cut formulas.
//!
//! - standard: `c2c - a - b`
//! - lay-in: `cut1 = overall - lay_in_span - b`, `cut2 = lay_in_span - a - lay_in`
//! - bushing: `c2c - a - b - thickness`
//!
//! The lay-in pair is asymmetric: cut 1 only loses B's socket, cut 2 loses
//! A's and the lay-in fitting's.
//!
//! Each formula uses checked arithmetic and returns `None` when an
//! intermediate value does not fit in `i64`.

use num_traits::CheckedSub;
use tracing::{debug, warn};

use crate::domain::{CutRequest, CutResult};
use crate::error::CutError;
use crate::math::{Inches, to_f64};

pub const STANDARD_LABEL: &str = "Cut";
pub const LAY_IN_FIRST_LABEL: &str = "Cut 1 (A -> Lay-in)";
pub const LAY_IN_SECOND_LABEL: &str = "Cut 2 (Lay-in -> B)";

/// `start` minus every value in `parts`, or `None` on overflow.
fn less_all(start: Inches, parts: &[Inches]) -> Option<Inches> {
    parts.iter().try_fold(start, |acc, part| acc.checked_sub(part))
}

pub fn calculate_standard(c2c: Inches, offset_a: Inches, offset_b: Inches) -> Option<Inches> {
    less_all(c2c, &[offset_a, offset_b])
}

/// Returns `(cut1, cut2)`.
pub fn calculate_lay_in(
    c2c_overall: Inches,
    c2c_lay_in: Inches,
    offset_a: Inches,
    offset_b: Inches,
    offset_lay_in: Inches,
) -> Option<(Inches, Inches)> {
    let cut1 = less_all(c2c_overall, &[c2c_lay_in, offset_b])?;
    let cut2 = less_all(c2c_lay_in, &[offset_a, offset_lay_in])?;
    Some((cut1, cut2))
}

/// `thickness` is supplied separately from the bushing's own catalog offset.
pub fn calculate_bushing(c2c: Inches, offset_a: Inches, offset_b: Inches, thickness: Inches) -> Option<Inches> {
    less_all(c2c, &[offset_a, offset_b, thickness])
}

/// Apply the formula matching the request shape.
pub fn evaluate(request: &CutRequest) -> Result<CutResult, CutError> {
    let kind = request.kind();
    let out_of_range = || {
        warn!(kind = ?kind, "cut arithmetic overflowed");
        CutError::OutOfRange {
            calculation: kind.display_name().to_string(),
        }
    };

    let result = match request {
        CutRequest::Standard { a, b, c2c } => {
            let cut = calculate_standard(*c2c, a.offset, b.offset).ok_or_else(out_of_range)?;
            CutResult::single(STANDARD_LABEL, cut)
        }
        CutRequest::LayIn {
            a,
            lay_in,
            b,
            c2c_overall,
            c2c_lay_in,
        } => {
            let (cut1, cut2) = calculate_lay_in(*c2c_overall, *c2c_lay_in, a.offset, b.offset, lay_in.offset)
                .ok_or_else(out_of_range)?;
            CutResult::pair((LAY_IN_FIRST_LABEL, cut1), (LAY_IN_SECOND_LABEL, cut2))
        }
        CutRequest::Bushing {
            a,
            b,
            c2c,
            thickness,
            ..
        } => {
            let cut = calculate_bushing(*c2c, a.offset, b.offset, *thickness).ok_or_else(out_of_range)?;
            CutResult::single(STANDARD_LABEL, cut)
        }
    };

    for length in &result.lengths {
        debug!(kind = ?kind, label = length.label, inches = to_f64(&length.value), "computed cut");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connection, FittingRole, OffsetVariant};
    use crate::math::parse_rational;
    use num_rational::Ratio;

    fn d(s: &str) -> Inches {
        parse_rational(s).unwrap()
    }

    fn conn(role: FittingRole, offset: &str) -> Connection {
        Connection {
            role,
            fitting_type: "Elbow 90(Socket x Socket)".to_string(),
            size: "2".to_string(),
            offset: d(offset),
            variant: OffsetVariant::Primary,
        }
    }

    #[test]
    fn standard_formula() {
        assert_eq!(calculate_standard(d("12"), d("0.75"), d("0.6875")), Some(d("10.5625")));
    }

    #[test]
    fn lay_in_formula_is_asymmetric() {
        let (cut1, cut2) = calculate_lay_in(d("20"), d("8"), d("0.5"), d("0.6"), d("0.4")).unwrap();
        assert_eq!(cut1, d("11.4"));
        assert_eq!(cut2, d("7.1"));
    }

    #[test]
    fn bushing_formula() {
        assert_eq!(calculate_bushing(d("10"), d("0.5"), d("0.5"), d("0.25")), Some(d("8.75")));
    }

    #[test]
    fn negative_results_are_not_clamped() {
        assert_eq!(calculate_standard(d("1"), d("0.75"), d("0.75")), Some(Ratio::new(-1, 2)));
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        // Pairwise coprime denominators near 1e9: 12 + 1/p - 1/q - 1/r needs
        // a numerator beyond i64.
        let c2c = Ratio::from_integer(12) + Ratio::new(1, 999_999_937);
        let (a, b) = (Ratio::new(1, 999_999_929), Ratio::new(1, 999_999_893));
        assert_eq!(calculate_standard(c2c, a, b), None);
        assert_eq!(calculate_bushing(c2c, a, b, d("0.25")), None);
        assert_eq!(calculate_lay_in(c2c, d("0"), d("0.5"), a, b), None);

        let request = CutRequest::Standard {
            a: Connection {
                offset: a,
                ..conn(FittingRole::A, "0")
            },
            b: Connection {
                offset: b,
                ..conn(FittingRole::B, "0")
            },
            c2c,
        };
        assert_eq!(
            evaluate(&request),
            Err(CutError::OutOfRange {
                calculation: "Standard Cut".to_string()
            })
        );
    }

    #[test]
    fn evaluate_dispatches_on_request_shape() {
        let request = CutRequest::LayIn {
            a: conn(FittingRole::A, "0.5"),
            lay_in: conn(FittingRole::LayIn, "0.4"),
            b: conn(FittingRole::B, "0.6"),
            c2c_overall: d("20"),
            c2c_lay_in: d("8"),
        };
        let result = evaluate(&request).unwrap();
        assert_eq!(result.lengths.len(), 2);
        assert_eq!(result.lengths[0].label, LAY_IN_FIRST_LABEL);
        assert_eq!(result.lengths[0].value, d("11.4"));
        assert_eq!(result.lengths[1].value, d("7.1"));

        let request = CutRequest::Bushing {
            a: conn(FittingRole::A, "0.5"),
            bushing: conn(FittingRole::Bushing, "9"),
            b: conn(FittingRole::B, "0.5"),
            c2c: d("10"),
            thickness: d("0.25"),
        };
        // The bushing's own offset plays no part.
        assert_eq!(evaluate(&request).unwrap().lengths[0].value, d("8.75"));
    }
}
