//! Addition and, via negation, subtraction.
//!
//! `sub(a, b)` is not implemented separately: it is simply `add(a,
//! b.negated())`. Every sign combination addition itself needs to handle
//! (same-sign magnitude addition, opposite-sign magnitude subtraction) is
//! already required by IEEE addition alone, since `a + (-b)` with `a`, `b`
//! both positive is exactly the opposite-sign case.

use std::cmp::Ordering;

use super::{decompose, finish};
use crate::value::Quad;
use crate::wide::Wide256;

/// Bits of zero-padding reserved below the 128-bit fraction during
/// magnitude subtraction, so that aligning operands whose exponents
/// differ by up to 127 loses no information at all: the bits shifted out
/// during alignment are all padding, never real mantissa bits. Beyond a
/// gap of 127 the shift starts discarding real mantissa bits of the
/// smaller operand; those are folded back in as a single sticky bit
/// (see `add_opposite_sign`) rather than dropped outright.
const SUB_PAD: u32 = 127;

pub fn add(a: Quad, b: Quad) -> Quad {
    if a.is_nan() || b.is_nan() {
        return Quad::nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return add_infinities(a, b);
    }
    if a.is_zero() && b.is_zero() {
        return if a.is_negative() && b.is_negative() { Quad::zero().negated() } else { Quad::zero() };
    }
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }

    if a.is_negative() == b.is_negative() {
        add_same_sign(a, b)
    } else {
        add_opposite_sign(a, b)
    }
}

fn add_infinities(a: Quad, b: Quad) -> Quad {
    match (a.is_infinite(), b.is_infinite()) {
        (true, true) if a.is_negative() != b.is_negative() => Quad::nan(),
        (true, _) => a,
        (_, true) => b,
        (false, false) => unreachable!("add_infinities called with no infinite operand"),
    }
}

fn add_same_sign(a: Quad, b: Quad) -> Quad {
    let negative = a.is_negative();
    let (exp_a, frac_a) = decompose(a);
    let (exp_b, frac_b) = decompose(b);

    let (big_exp, big_frac, small_exp, small_frac) =
        if exp_a >= exp_b { (exp_a, frac_a, exp_b, frac_b) } else { (exp_b, frac_b, exp_a, frac_a) };

    let diff = saturating_diff(big_exp, small_exp);
    let small_sig = Wide256::new(1, small_frac);
    let (aligned, guard) = small_sig.shr_with_guard(diff);
    let big_sig = Wide256::new(1, big_frac);

    let (sum, _) = big_sig.overflowing_add(aligned);
    let (exp, raw_frac, final_guard) = if sum.hi == 1 {
        (big_exp, sum.lo, guard)
    } else {
        // sum.hi is 2 or 3: the addend carried past the unit bit, so the
        // result needs renormalizing by one place. The alignment guard
        // bit is strictly less significant than the new guard bit and so
        // can never change a round-half-away-from-zero decision; discard it.
        let (shifted, g) = sum.shr_with_guard(1);
        (big_exp + 1, shifted.lo, g)
    };

    let (frac, carry) = round_up(raw_frac, final_guard);
    finish(negative, exp, frac, carry)
}

fn add_opposite_sign(a: Quad, b: Quad) -> Quad {
    let order = a.compare_magnitude_to(b);
    if order == Ordering::Equal {
        return Quad::zero();
    }
    let (big, small) = if order == Ordering::Greater { (a, b) } else { (b, a) };
    let negative = big.is_negative();

    let (big_exp, big_frac) = decompose(big);
    let (small_exp, small_frac) = decompose(small);
    let diff = saturating_diff(big_exp, small_exp);

    let big_padded = Wide256::new(1, big_frac).shl(SUB_PAD);
    let small_padded = Wide256::new(1, small_frac).shl(SUB_PAD);

    // For `diff <= SUB_PAD` the bits the shift discards are all padding
    // zeros, so the shift is exact. Beyond that it starts discarding real
    // mantissa bits; folding their sticky OR into the aligned value's own
    // low bit keeps the subsequent subtraction from ever mistaking a
    // truncated-down remainder for an exact tie (a discarded half-bit
    // here makes the true difference strictly less than what a bare
    // guard-bit rounding would see, never equal to it).
    let aligned = if diff == 0 {
        small_padded
    } else {
        let shifted = small_padded.shr_with_guard(diff).0;
        if small_padded.low_bits_nonzero(diff) {
            Wide256::new(shifted.hi, shifted.lo | 1)
        } else {
            shifted
        }
    };

    let raw = big_padded.wrapping_sub(aligned);
    if raw.is_zero() {
        return Quad::zero();
    }

    let lz = raw.leading_zeros();
    let normalized = raw.shl(lz);
    let exp = big_exp - lz as i64;

    let (shifted, guard) = normalized.shr_with_guard(SUB_PAD);
    let (frac, carry) = round_up(shifted.lo, guard);
    finish(negative, exp, frac, carry)
}

fn round_up(frac: u128, guard: bool) -> (u128, bool) {
    if guard {
        frac.overflowing_add(1)
    } else {
        (frac, false)
    }
}

fn saturating_diff(big_exp: i64, small_exp: i64) -> u32 {
    big_exp.saturating_sub(small_exp).clamp(0, 300) as u32
}
