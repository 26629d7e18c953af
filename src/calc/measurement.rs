//! Operator-entered measurements.

use crate::error::CutError;
use crate::math::{Inches, from_f64, parse_rational};

/// Parse a tape measurement such as `12`, `11.75`, `11 3/4` or `47/4`.
///
/// `field` names the input in the error (e.g. `"center-to-center"`).
pub fn parse_measurement(field: &str, raw: &str) -> Result<Inches, CutError> {
    parse_rational(raw).ok_or_else(|| CutError::InvalidMeasurement {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Accept a measurement that is already a float (e.g. from a numeric widget).
pub fn measurement_from_f64(field: &str, value: f64) -> Result<Inches, CutError> {
    from_f64(value).ok_or_else(|| CutError::InvalidMeasurement {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Ratio;

    #[test]
    fn accepts_tape_forms() {
        assert_eq!(parse_measurement("c2c", "11 3/4").unwrap(), Ratio::new(47, 4));
        assert_eq!(parse_measurement("c2c", "11.75\"").unwrap(), Ratio::new(47, 4));
        assert_eq!(measurement_from_f64("c2c", 12.25).unwrap(), Ratio::new(49, 4));
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = parse_measurement("center-to-center", "twelve").unwrap_err();
        assert_eq!(
            err,
            CutError::InvalidMeasurement {
                field: "center-to-center".to_string(),
                value: "twelve".to_string(),
            }
        );
        assert!(measurement_from_f64("thickness", f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_values_too_large_or_too_fine_to_cut() {
        for raw in ["100000000000000000", "12 1/999999937", "1/999999929", "-2000000"] {
            let err = parse_measurement("center-to-center", raw).unwrap_err();
            assert!(matches!(err, CutError::InvalidMeasurement { ref value, .. } if value == raw));
        }
        assert!(measurement_from_f64("c2c", 1e17).is_err());
    }
}
