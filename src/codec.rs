//! External codecs (C5): conversions to and from host numeric types, the
//! IEEE-754 binary128 transport encoding, and random generation.
//!
//! Grounded on `utils::decimal::DecimalSerializer::encode_ieee`/
//! `decode_ieee`'s bit-packing shape, generalized from a runtime-
//! configurable field layout to this crate's fixed 1/15/112-bit one, and
//! on `utils::random::weighted_random`'s `rand::thread_rng()` convenience
//! idiom for the free-function random draws.

use rand::RngCore;

use crate::arith::{decompose, finish};
use crate::value::{Quad, EXP_BIAS};

// ---- host f64 -------------------------------------------------

/// `15361 = EXP_BIAS - 1023` would be IEEE binary128's bias offset; this
/// crate instead reuses the host's own `f64` arithmetic for the final
/// rounding step (round-to-nearest-ties-to-even, matching `f64`'s native
/// convention) rather than re-deriving it bit by bit.
impl From<Quad> for f64 {
    fn from(q: Quad) -> f64 {
        if q.is_nan() {
            return f64::NAN;
        }
        if q.is_infinite() {
            return if q.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        if q.is_zero() {
            return if q.is_negative() { -0.0 } else { 0.0 };
        }

        let (exp, frac) = decompose(q);
        if exp > 1023 {
            return if q.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        if exp < -1074 {
            return if q.is_negative() { -0.0 } else { 0.0 };
        }

        // Round the `1.frac * 2^exp` significand to nearest-even at
        // whatever cut produces f64's 52-bit mantissa field: 76 bits below
        // the 128-bit fraction for a normal result, or further still for
        // a subnormal one, where an extra `-1022 - exp` bits push the
        // implicit leading one itself into the explicit mantissa field as
        // gradual underflow takes hold.
        let extra = if exp < -1022 { (-1022 - exp) as u32 } else { 0 };
        let shift = 76 + extra;

        // The kept bits below the cut are `(1<<128 | frac) >> shift`,
        // minus the implicit leading one for a normal result (f64 does
        // not store it either, same convention as this crate's own
        // mantissa). The `1<<128` term only ever contributes a single
        // bit, at position `128 - shift` (always >= 0 here), so it is
        // added back in directly rather than materialized in a wider
        // integer.
        let frac_part = if shift >= 128 { 0u64 } else { (frac >> shift) as u64 };
        let mut mantissa = if extra == 0 { frac_part } else { frac_part + (1u64 << (128 - shift)) };

        let guard = (frac >> (shift - 1)) & 1 == 1;
        let sticky_mask = (1u128 << (shift - 1)) - 1;
        let sticky = frac & sticky_mask != 0;
        if guard && (sticky || mantissa & 1 == 1) {
            mantissa += 1;
        }

        let (biased, mantissa) = if extra == 0 {
            // normal path: a carry out of the 52-bit field bumps the
            // exponent, matching ordinary mantissa renormalization.
            if mantissa >> 52 != 0 {
                (exp + 1 + 1023, 0u64)
            } else {
                (exp + 1023, mantissa)
            }
        } else {
            // subnormal path: a carry out of the 52-bit field lands
            // exactly on the smallest normal value.
            if mantissa >> 52 != 0 {
                (1, 0u64)
            } else {
                (0, mantissa)
            }
        };

        if biased >= 2047 {
            return if q.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY };
        }

        let bits = ((biased as u64) << 52) | mantissa;
        let value = f64::from_bits(bits);
        if q.is_negative() {
            -value
        } else {
            value
        }
    }
}

impl From<&Quad> for f64 {
    fn from(q: &Quad) -> f64 {
        f64::from(*q)
    }
}

impl From<f64> for Quad {
    fn from(v: f64) -> Quad {
        if v.is_nan() {
            return Quad::nan();
        }
        if v.is_infinite() {
            return if v < 0.0 { Quad::negative_infinity() } else { Quad::positive_infinity() };
        }
        if v == 0.0 {
            return if v.is_sign_negative() { Quad::zero().negated() } else { Quad::zero() };
        }

        let negative = v.is_sign_negative();
        let bits = v.to_bits();
        let biased_exp = ((bits >> 52) & 0x7FF) as i64;
        let mantissa52 = bits & 0x000F_FFFF_FFFF_FFFF;

        let (exp, mant52) = if biased_exp == 0 {
            // subnormal f64: normalize by left-shifting until the highest
            // set bit reaches position 52, where it becomes the implicit
            // leading one (and is discarded for free once `mant52` is
            // later shifted into the full 128-bit fraction field, since
            // anything at bit 128 or above just falls off the top).
            let shift = mantissa52.leading_zeros() - 11; // mantissa52 occupies the low 52 bits
            (-1022 - shift as i64, mantissa52 << shift)
        } else {
            (biased_exp - 1023, mantissa52)
        };

        let frac = (mant52 as u128) << 76;
        finish(negative, exp, frac, false)
    }
}

// ---- host signed integers -------------------------------------------------

impl From<Quad> for i64 {
    fn from(q: Quad) -> i64 {
        to_clamped_i128(q).clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl From<&Quad> for i64 {
    fn from(q: &Quad) -> i64 {
        i64::from(*q)
    }
}

impl From<Quad> for i32 {
    fn from(q: Quad) -> i32 {
        to_clamped_i128(q).clamp(i32::MIN as i128, i32::MAX as i128) as i32
    }
}

impl From<&Quad> for i32 {
    fn from(q: &Quad) -> i32 {
        i32::from(*q)
    }
}

/// Truncates `q` toward zero into an `i128`, saturating at its bounds.
/// `i128` comfortably holds every value either `i64` or `i32` needs to
/// clamp from, including `Quad`s far outside either range.
fn to_clamped_i128(q: Quad) -> i128 {
    if q.is_nan() || q.is_zero() {
        return 0;
    }
    if q.is_infinite() {
        return if q.is_negative() { i128::MIN } else { i128::MAX };
    }

    let (exp, frac) = decompose(q);
    if exp < 0 {
        return 0;
    }
    if exp >= 127 {
        return if q.is_negative() { i128::MIN } else { i128::MAX };
    }

    // True value: `floor((2^128 + frac) / 2^(128 - exp))`. `2^128` does
    // not fit `u128`, so everything is pre-halved (`2^127 | frac>>1`
    // differs from `(2^128+frac)/2` by at most the LSB of `frac`, whose
    // weight is far below the granularity this integer truncation keeps)
    // before the same shift is applied one bit short.
    let significand = (1u128 << 127 | (frac >> 1)) >> (127 - exp);
    let magnitude = significand as i128;
    if q.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

// ---- IEEE-754 binary128 -------------------------------------------------

const IEEE_EXP_BITS: u32 = 15;
const IEEE_FRAC_BITS: u32 = 112;
const IEEE_BIAS: i64 = 16383;
const IEEE_MAX_BIASED: u64 = (1 << IEEE_EXP_BITS) - 1;
const IEEE_MIN_NORMAL_EXP: i64 = 1 - IEEE_BIAS;

impl Quad {
    /// Packs into the two big-endian `u64` words of an IEEE-754 binary128
    /// value: `[hi, lo]` where `hi` holds the sign, 15-bit exponent, and
    /// the top 48 fraction bits, and `lo` the remaining 64 fraction bits.
    pub fn to_ieee754_words(self) -> [u64; 2] {
        if self.is_nan() {
            return [0x7FFF_8000_0000_0000, 0];
        }
        if self.is_infinite() {
            let sign = (self.is_negative() as u64) << 63;
            return [sign | (IEEE_MAX_BIASED << 48), 0];
        }
        if self.is_zero() {
            return [(self.is_negative() as u64) << 63, 0];
        }

        let (exp, frac) = decompose(self);
        let sign_bit = (self.is_negative() as u64) << 63;

        if exp < IEEE_MIN_NORMAL_EXP {
            // Binary128 subnormals carry no implicit leading one, so the
            // source's implicit bit has to be folded into the explicit
            // field itself, `d` positions below its usual spot.
            let d = (IEEE_MIN_NORMAL_EXP - exp) as u32;
            if d > IEEE_FRAC_BITS {
                return pack_ieee(sign_bit, 0, 0);
            }
            let leading_bit_pos = IEEE_FRAC_BITS - d;
            let (tail, tail_carry) = round_frac_to_bits(frac, 128, 16 + d);
            let frac112 = if tail_carry { 1u128 << (leading_bit_pos + 1) } else { tail | (1u128 << leading_bit_pos) };
            if frac112 >= 1u128 << IEEE_FRAC_BITS {
                return pack_ieee(sign_bit, 1, 0);
            }
            return pack_ieee(sign_bit, 0, frac112);
        }

        if exp > IEEE_BIAS {
            let sign = (self.is_negative() as u64) << 63;
            return [sign | (IEEE_MAX_BIASED << 48), 0];
        }

        let (frac112, carry) = round_frac_to_bits(frac, 128, 16);
        let (exp, frac112) = if carry { (exp + 1, 0u128) } else { (exp, frac112) };
        if exp > IEEE_BIAS {
            let sign = (self.is_negative() as u64) << 63;
            return [sign | (IEEE_MAX_BIASED << 48), 0];
        }
        let biased = (exp + IEEE_BIAS) as u64;
        pack_ieee(sign_bit, biased, frac112)
    }

    /// Packs into the 16-byte big-endian rendering of [`to_ieee754_words`].
    pub fn to_ieee754_bytes(self) -> [u8; 16] {
        let [hi, lo] = self.to_ieee754_words();
        let mut out = [0u8; 16];
        out[0..8].copy_from_slice(&hi.to_be_bytes());
        out[8..16].copy_from_slice(&lo.to_be_bytes());
        out
    }

    /// The inverse of [`Quad::to_ieee754_words`].
    pub fn from_ieee754_words(words: [u64; 2]) -> Quad {
        let [hi, lo] = words;
        let negative = hi & (1 << 63) != 0;
        let biased = (hi >> 48) & IEEE_MAX_BIASED;
        let frac112 = (((hi & 0x0000_FFFF_FFFF_FFFF) as u128) << 64) | lo as u128;

        if biased == IEEE_MAX_BIASED {
            return if frac112 == 0 {
                if negative { Quad::negative_infinity() } else { Quad::positive_infinity() }
            } else {
                Quad::nan()
            };
        }
        if biased == 0 && frac112 == 0 {
            return if negative { Quad::zero().negated() } else { Quad::zero() };
        }

        let frac128 = frac112 << (128 - IEEE_FRAC_BITS);
        if biased == 0 {
            // IEEE subnormal: no implicit bit, exponent pinned at the
            // minimum normal exponent minus the leading-zero count.
            let lz = frac112.leading_zeros() - (128 - IEEE_FRAC_BITS);
            let shift = lz + 1;
            let normalized = if shift >= 128 { 0 } else { frac128 << shift };
            let exp = IEEE_MIN_NORMAL_EXP - shift as i64;
            return finish(negative, exp, normalized, false);
        }

        let exp = biased as i64 - IEEE_BIAS;
        finish(negative, exp, frac128, false)
    }

    /// The inverse of [`Quad::to_ieee754_bytes`].
    pub fn from_ieee754_bytes(bytes: [u8; 16]) -> Quad {
        let hi = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let lo = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
        Quad::from_ieee754_words([hi, lo])
    }

    // ---- random generation -------------------------------------------------

    /// Fills sign, all 32 exponent bits, and all 128 mantissa bits from
    /// `rng`. Spans the full representable range but is *not* uniformly
    /// distributed over it — most of that range is astronomically large
    /// or small exponents, so values near "ordinary" magnitudes are
    /// relatively rare. Preserved as a documented, intentional port of
    /// this behavior rather than treated as a bug; see [`Quad::
    /// next_uniform_random`] for a uniform `[0, 1)` alternative.
    pub fn next_random(rng: &mut impl RngCore) -> Quad {
        let negative = rng.next_u32() & 1 == 1;
        let exponent = rng.next_u32();
        let mant_hi = rng.next_u64();
        let mant_lo = rng.next_u64();
        Quad::from_raw_biased(negative, exponent, mant_hi, mant_lo)
    }

    /// A value uniformly distributed over `[0, 1)`: the mantissa is filled
    /// from `rng` with the exponent pinned at `EXP_ONE`, then `1.0` is
    /// subtracted off. Added under its own name per this port's "a
    /// uniform variant gets a distinct name" design note rather than
    /// changing [`Quad::next_random`]'s existing contract.
    pub fn next_uniform_random(rng: &mut impl RngCore) -> Quad {
        let mant_hi = rng.next_u64();
        let mant_lo = rng.next_u64();
        let raw = Quad::from_raw_biased(false, EXP_BIAS, mant_hi, mant_lo);
        crate::arith::add(raw, Quad::one().negated())
    }
}

fn pack_ieee(sign_bit: u64, biased: u64, frac112: u128) -> [u64; 2] {
    let hi_frac = (frac112 >> 64) as u64;
    let lo_frac = frac112 as u64;
    [sign_bit | (biased << 48) | hi_frac, lo_frac]
}

/// Rounds the top `target_bits` of a `total_bits`-wide fraction half-up,
/// returning `(rounded, carried_out)`. `shift` is `total_bits -
/// target_bits`, i.e. how many low bits are being dropped.
fn round_frac_to_bits(frac: u128, total_bits: u32, shift: u32) -> (u128, bool) {
    if shift == 0 {
        return (frac, false);
    }
    if shift > total_bits {
        return (0, false);
    }
    let guard = (frac >> (shift - 1)) & 1 == 1;
    // `shift == total_bits` drops every bit of `frac`; the zero-width kept
    // value can't be shifted out directly (that would overflow the shift
    // amount), so it's forced to zero and only the guard bit can carry.
    let kept = if shift == total_bits { 0 } else { frac >> shift };
    if guard {
        let bits = total_bits - shift;
        let max = if bits >= 128 { u128::MAX } else { (1u128 << bits) - 1 };
        if kept == max {
            (0, true)
        } else {
            (kept + 1, false)
        }
    } else {
        (kept, false)
    }
}

/// A process-wide convenience draw from [`Quad::next_random`], grounded on
/// the teacher's `utils::random::weighted_random` using `rand::
/// thread_rng()` directly for exactly this kind of one-off draw.
pub fn random_quad() -> Quad {
    Quad::next_random(&mut rand::thread_rng())
}

/// A process-wide convenience draw from [`Quad::next_uniform_random`].
pub fn uniform_random_quad() -> Quad {
    Quad::next_uniform_random(&mut rand::thread_rng())
}
