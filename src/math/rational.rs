//! Exact inch arithmetic.
//!
//! Fitting offsets are published in 1/16ths and 1/32nds, and measurements are
//! taken with a tape in 1/16ths. Keeping them as `Ratio<i64>` means a value like
//! `10.5625` is exactly `169/16` and rounding to the nearest sixteenth never
//! lands on the wrong side of a tie because of binary float noise.
//!
//! Accepted text forms:
//!
//! - decimals: `12`, `0.6875`, `-1.5`
//! - fractions: `15/32`
//! - mixed numbers: `1 5/16`, `-2 1/2`
//!
//! An optional trailing inch mark (`"`) is ignored.
//!
//! Parsed values are bounded to [`MAX_INCHES`] in magnitude and
//! [`MAX_DENOMINATOR`] in denominator, which keeps every cut formula well
//! inside `i64` for realistic inputs.

use num_rational::Ratio;
use num_traits::{CheckedAdd, Signed, Zero};

/// A length in inches.
pub type Inches = Ratio<i64>;

/// Denominator bound applied when a value arrives as a float.
pub const MAX_FLOAT_DENOMINATOR: i64 = 1000;

/// Largest accepted magnitude, in inches.
pub const MAX_INCHES: i64 = 1_000_000;

/// Largest accepted denominator of a parsed value.
pub const MAX_DENOMINATOR: i64 = 1_000_000;

/// Fractional digits kept exactly when parsing decimal text.
///
/// Longer decimals are float-originated in practice (spreadsheet exports) and
/// go through [`from_f64`] instead.
const MAX_DECIMAL_DIGITS: usize = 6;

/// Parse a decimal, fraction or mixed-number string into an exact value.
///
/// Returns `None` for malformed text and for values outside
/// [`within_bounds`].
pub fn parse_rational(raw: &str) -> Option<Inches> {
    parse_unbounded(raw).filter(within_bounds)
}

/// `true` when `|value| <= MAX_INCHES` and its reduced denominator is at most
/// [`MAX_DENOMINATOR`].
pub fn within_bounds(value: &Inches) -> bool {
    let limit = Inches::from_integer(MAX_INCHES);
    *value.denom() <= MAX_DENOMINATOR && *value <= limit && *value >= -limit
}

fn parse_unbounded(raw: &str) -> Option<Inches> {
    let s = raw.trim().trim_end_matches('"').trim();
    if s.is_empty() {
        return None;
    }

    let mut parts = s.split_whitespace();
    let first = parts.next()?;
    match (parts.next(), parts.next()) {
        (None, _) => {
            if first.contains('/') {
                parse_fraction(first)
            } else {
                parse_decimal(first)
            }
        }
        (Some(frac), None) => parse_mixed(first, frac),
        _ => None,
    }
}

/// `whole n/d`; the sign of the whole part applies to the fraction as well.
fn parse_mixed(whole: &str, frac: &str) -> Option<Inches> {
    let (negative, digits) = split_sign(whole);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = digits.parse().ok()?;
    let frac = parse_fraction(frac)?;
    if frac.is_negative() {
        return None;
    }
    let magnitude = Inches::from_integer(whole).checked_add(&frac)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_fraction(s: &str) -> Option<Inches> {
    let (numer, denom) = s.split_once('/')?;
    let (negative, numer) = split_sign(numer.trim());
    let denom = denom.trim();
    if numer.is_empty() || !numer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if denom.is_empty() || !denom.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let numer: i64 = numer.parse().ok()?;
    let denom: i64 = denom.parse().ok()?;
    if denom == 0 {
        return None;
    }
    let value = Ratio::new(numer, denom);
    Some(if negative { -value } else { value })
}

fn parse_decimal(s: &str) -> Option<Inches> {
    let (negative, body) = split_sign(s);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };

    let is_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let exact = !(int_part.is_empty() && frac_part.is_empty())
        && is_digits(int_part)
        && is_digits(frac_part)
        && frac_part.len() <= MAX_DECIMAL_DIGITS;

    if exact {
        if let Some(value) = exact_decimal(int_part, frac_part) {
            return Some(if negative { -value } else { value });
        }
    }

    // Scientific notation, long decimals and the like.
    let v: f64 = s.parse().ok()?;
    from_f64(v)
}

fn exact_decimal(int_part: &str, frac_part: &str) -> Option<Inches> {
    let whole: i64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let scale = 10_i64.checked_pow(frac_part.len() as u32)?;
    let frac: i64 = if frac_part.is_empty() { 0 } else { frac_part.parse().ok()? };
    let numer = whole.checked_mul(scale)?.checked_add(frac)?;
    Some(Ratio::new(numer, scale))
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

/// Convert a float to the closest fraction whose denominator does not exceed
/// [`MAX_FLOAT_DENOMINATOR`].
pub fn from_f64(value: f64) -> Option<Inches> {
    limit_denominator(value, MAX_FLOAT_DENOMINATOR).filter(within_bounds)
}

/// Best rational approximation of `value` with denominator `<= max_denom`,
/// computed from the continued-fraction convergents and the final
/// semiconvergent.
pub fn limit_denominator(value: f64, max_denom: i64) -> Option<Inches> {
    if !value.is_finite() || max_denom < 1 {
        return None;
    }
    let negative = value < 0.0;
    let x = value.abs();
    if x >= (i64::MAX / max_denom) as f64 {
        return None;
    }

    // (p0/q0, p1/q1) are the two most recent convergents.
    let (mut p0, mut q0, mut p1, mut q1) = (0_i64, 1_i64, 1_i64, 0_i64);
    let mut rest = x;
    loop {
        let a = rest.floor() as i64;
        let next = a
            .checked_mul(q1)
            .and_then(|v| v.checked_add(q0))
            .filter(|q2| *q2 <= max_denom);
        let Some(q2) = next else { break };
        let p2 = a.checked_mul(p1)?.checked_add(p0)?;
        (p0, q0, p1, q1) = (p1, q1, p2, q2);

        let frac = rest - rest.floor();
        if frac < 1e-12 {
            break;
        }
        rest = 1.0 / frac;
    }

    let convergent = Ratio::new(p1, q1);
    let k = (max_denom - q0) / q1;
    let best = if k > 0 {
        let semi = Ratio::new(p0 + k * p1, q0 + k * q1);
        if distance(&semi, x) < distance(&convergent, x) {
            semi
        } else {
            convergent
        }
    } else {
        convergent
    };

    Some(if negative { -best } else { best })
}

fn distance(r: &Inches, x: f64) -> f64 {
    (to_f64(r) - x).abs()
}

/// Round to the nearest multiple of `1/denom`, ties toward positive infinity.
///
/// Returns the count of `1/denom` units, i.e. `floor(value * denom + 1/2)`.
/// Computed in `i128`, so it cannot overflow for any `Inches` and `i64` scale.
pub fn round_half_up(value: &Inches, denom: i64) -> i128 {
    let scaled = i128::from(*value.numer()) * i128::from(denom);
    let d = i128::from(*value.denom());
    let (q, r) = (scaled.div_euclid(d), scaled.rem_euclid(d));
    if 2 * r >= d { q + 1 } else { q }
}

/// Render `value` with exactly `places` decimal places, rounding half up.
pub fn to_decimal_string(value: &Inches, places: u32) -> String {
    let places = places.min(18);
    let scale = 10_i64.pow(places);
    let units = round_half_up(value, scale);
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    let scale = scale as u128;
    if places == 0 {
        return format!("{sign}{abs}");
    }
    format!(
        "{sign}{}.{:0width$}",
        abs / scale,
        abs % scale,
        width = places as usize
    )
}

/// Lossy float view used for display and logging only.
pub fn to_f64(value: &Inches) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}

/// `true` when the value is exactly zero or positive.
pub fn is_non_negative(value: &Inches) -> bool {
    value.is_zero() || value.is_positive()
}
