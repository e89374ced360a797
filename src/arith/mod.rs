//! The arithmetic kernel (C2): add, subtract, multiply, divide.
//!
//! All four operations share the same outer shape: a fixed decision table
//! handles NaN/infinity/zero, then a sign-agnostic magnitude routine does
//! the real work over the two operands' `(unbiased exponent, 128-bit
//! fraction)` pairs, and [`finish`] re-normalizes the result back into a
//! `Quad`, including the conversion to subnormal form when the result
//! underflows the normal range.
//!
//! Every magnitude routine that needs to discard bits (shifting to align
//! exponents, normalizing a product, dividing) keeps exactly one guard bit
//! — the bit immediately below the final 128-bit cutoff — and rounds up
//! iff it is set. Round-to-nearest-ties-away-from-zero never needs a
//! separate sticky bit: a discarded remainder of exactly one half (guard
//! set, nothing below it) rounds up identically to a remainder strictly
//! greater than one half, so the two cases never need to be told apart.

mod add;
mod div;
mod mul;

pub use add::add;
pub use div::div;
pub use mul::mul;

use crate::value::{Quad, EXP_BIAS, EXP_INFINITY, EXP_MIN_NORMAL};
use crate::wide::Wide256;

/// `1 - EXP_BIAS`: the unbiased exponent shared by every subnormal value
/// once its mantissa is normalized to have an implicit leading one.
const SUBNORMAL_UNBIASED_EXP: i64 = EXP_MIN_NORMAL as i64 - EXP_BIAS as i64;

/// Decomposes a finite, nonzero `Quad` into `(unbiased_exponent, fraction)`
/// such that the value equals `(1 + fraction / 2^128) * 2^unbiased_exponent`.
/// Subnormals are normalized (shifted until the leading bit reaches the
/// implicit-one position) so every caller can treat normal and subnormal
/// inputs identically.
pub(crate) fn decompose(q: Quad) -> (i64, u128) {
    if q.is_subnormal() {
        let mant = q.mantissa_bits();
        let lz = mant.leading_zeros();
        let shift = lz + 1;
        let frac = if shift >= 128 { 0 } else { mant << shift };
        (SUBNORMAL_UNBIASED_EXP - shift as i64, frac)
    } else {
        (q.unbiased_exponent(), q.mantissa_bits())
    }
}

/// Builds the final `Quad` from a sign, an unbiased exponent, a rounded
/// 128-bit fraction, and whether rounding carried out of the fraction
/// (meaning the true value is `(1 + 0) * 2^(exp + 1)`).
///
/// Saturates to infinity on overflow and converts to subnormal form (or
/// exact zero) on underflow, so every caller gets both saturation and
/// subnormal handling for free.
pub(crate) fn finish(negative: bool, exp: i64, frac: u128, carry: bool) -> Quad {
    let (exp, frac) = if carry { (exp + 1, 0u128) } else { (exp, frac) };
    let biased = exp.saturating_add(EXP_BIAS as i64);

    if biased >= EXP_INFINITY as i64 {
        return if negative { Quad::negative_infinity() } else { Quad::positive_infinity() };
    }
    if biased >= EXP_MIN_NORMAL as i64 {
        let hi = (frac >> 64) as u64;
        let lo = frac as u64;
        return Quad::from_raw_biased(negative, biased as u32, hi, lo);
    }

    subnormal_round(negative, biased, frac)
}

/// Converts a would-be-normal `(1 + frac/2^128) * 2^(biased - EXP_BIAS)`
/// with `biased <= 0` into its subnormal (or underflowed-to-zero, or
/// rounded-up-to-`MIN_NORMAL`) representation.
fn subnormal_round(negative: bool, biased: i64, frac: u128) -> Quad {
    let shift = (1 - biased).clamp(1, 300) as u32;
    let packed = Wide256::new(1, frac);
    let (shifted, guard) = packed.shr_with_guard(shift);
    let mant = shifted.lo;

    if guard {
        match mant.checked_add(1) {
            Some(mant) => {
                let hi = (mant >> 64) as u64;
                let lo = mant as u64;
                Quad::from_raw_biased(negative, 0, hi, lo)
            }
            None => Quad::from_raw_biased(negative, EXP_MIN_NORMAL, 0, 0),
        }
    } else {
        let hi = (mant >> 64) as u64;
        let lo = mant as u64;
        Quad::from_raw_biased(negative, 0, hi, lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_recomposes_normal() {
        let q = Quad::from_raw_biased(false, EXP_BIAS + 5, 0x1234, 0x5678);
        let (exp, frac) = decompose(q);
        assert_eq!(exp, 5);
        assert_eq!(frac, q.mantissa_bits());
    }

    #[test]
    fn decompose_normalizes_subnormal() {
        let q = Quad::from_raw_biased(false, 0, 0, 1); // MIN_VALUE
        let (exp, frac) = decompose(q);
        // MIN_VALUE's mantissa is `1`, with 127 leading zero bits ahead of
        // it in the 128-bit field; normalizing shifts it up by `lz + 1 =
        // 128` to put that bit in the implicit-one position.
        assert_eq!(exp, SUBNORMAL_UNBIASED_EXP - 128);
        assert_eq!(frac, 0);
    }

    #[test]
    fn finish_saturates_to_infinity() {
        let q = finish(false, i64::MAX / 2, 0, false);
        assert!(q.is_infinite());
        assert!(!q.is_negative());
    }

    #[test]
    fn finish_underflows_to_zero() {
        let q = finish(true, i64::MIN / 2, 0, false);
        assert!(q.is_zero());
        assert!(q.is_negative());
    }

    #[test]
    fn finish_rounds_subnormal_up_to_min_normal() {
        // biased = 0 means unbiased exp = EXP_MIN_NORMAL - EXP_BIAS - 1,
        // one below the smallest normal; an all-ones fraction plus a set
        // guard bit should round all the way up into MIN_NORMAL.
        let q = finish(false, SUBNORMAL_UNBIASED_EXP - 1, u128::MAX, false);
        assert_eq!(q, Quad::min_normal());
    }
}
