//! `Quad ⇄ bigdecimal::BigDecimal`, the arbitrary-precision bridge
//! `Display`/`FromStr` are themselves built on top of.

use bigdecimal::{BigDecimal, Zero};
use num_bigint::BigInt;

use super::quasi::{pow2_quasi, PRECISION};
use crate::arith::{decompose, finish};
use crate::error::ConvertError;
use crate::value::Quad;

/// `x / 2^n`, exact: `x / 2^n == x * 5^n / 10^n`, and `BigDecimal::new`
/// takes an unscaled integer and a power-of-ten scale directly, so this
/// needs no rounding at all for any `n`.
fn exact_div_pow2(x: BigInt, n: u32) -> BigDecimal {
    let mut five_pow = BigInt::from(1u8);
    let five = BigInt::from(5u8);
    for _ in 0..n {
        five_pow *= &five;
    }
    BigDecimal::new(x * five_pow, n as i64)
}

/// The exact (to [`PRECISION`] significant digits once the binary exponent
/// scaling is folded in) value of `value`, as a `BigDecimal`.
///
/// Fails with [`ConvertError::NotFinite`] for NaN and the infinities,
/// which have no decimal representation.
pub fn to_big_decimal(value: &Quad) -> Result<BigDecimal, ConvertError> {
    if !value.is_finite() {
        return Err(ConvertError::NotFinite);
    }
    if value.is_zero() {
        return Ok(BigDecimal::from(0));
    }

    let (exp, frac) = decompose(*value);
    let frac_bd = exact_div_pow2(BigInt::from(frac), 128);
    let mantissa = BigDecimal::from(1) + frac_bd;
    let scaled = (&mantissa * pow2_quasi(exp)).normalized();

    Ok(if value.is_negative() { -scaled } else { scaled })
}

/// The `Quad` nearest `d`'s exact value, saturating to infinity/zero on
/// overflow/underflow exactly as [`crate::arith::finish`] already does for
/// every other operation in this crate.
pub fn from_big_decimal(d: &BigDecimal) -> Quad {
    if d.is_zero() {
        return Quad::zero();
    }
    let negative = *d < BigDecimal::from(0);
    let magnitude = if negative { -d.clone() } else { d.clone() };

    let mut exp = estimate_log2(&magnitude);
    let mut ratio = (&magnitude * pow2_quasi(-exp)).with_prec(PRECISION);

    // `estimate_log2` is accurate to within a handful of ULPs of the f64
    // arithmetic it is built on; a couple of corrective steps always land
    // `ratio` in `[1, 2)`.
    let one = BigDecimal::from(1);
    let two = BigDecimal::from(2);
    for _ in 0..4 {
        if ratio < one {
            exp -= 1;
            ratio = (&magnitude * pow2_quasi(-exp)).with_prec(PRECISION);
        } else if ratio >= two {
            exp += 1;
            ratio = (&magnitude * pow2_quasi(-exp)).with_prec(PRECISION);
        } else {
            break;
        }
    }

    let two_pow_128 = BigInt::from(1u8) << 128u32;
    let scaled_frac = (&ratio - &one) * BigDecimal::from(BigInt::from(1u8) << 128u32);
    let rounded = scaled_frac.with_scale_round(0, bigdecimal::RoundingMode::HalfUp);
    let (frac_int, _) = rounded.as_bigint_and_exponent();

    let (frac, carry) = if frac_int >= two_pow_128 {
        (0u128, true)
    } else {
        (frac_int.to_string().parse::<u128>().unwrap_or(0), false)
    };

    finish(negative, exp, frac, carry)
}

/// `floor(log2(x))` for a positive `BigDecimal`, via its decimal exponent
/// and a handful of leading digits read off as an `f64` — exact enough to
/// seed [`from_big_decimal`]'s corrective loop, never used as the final
/// answer on its own.
fn estimate_log2(x: &BigDecimal) -> i64 {
    let (digits, scale) = x.as_bigint_and_exponent();
    let digit_str = digits.to_string();
    let ndigits = digit_str.len() as i64;
    let decimal_exp = ndigits - 1 - scale;

    let take = digit_str.len().min(17);
    let leading: f64 = digit_str[..take].parse().unwrap_or(1.0);
    let leading_double = leading / 10f64.powi(take as i32 - 1);

    let log2_10 = std::f64::consts::LOG2_10;
    (decimal_exp as f64 * log2_10 + leading_double.log2()).floor() as i64
}
