//! The value model (C1): the `Quad` aggregate, its bit-layout constants,
//! predicates, constructors, accessors, and total ordering.
//!
//! The field layout mirrors the configurable IEEE-754-style encoder the
//! teacher crate hand-rolls for host floats (`utils::decimal::
//! DecimalSerializer`), specialized to a fixed 1-bit sign / 32-bit exponent
//! / 128-bit mantissa layout instead of a runtime-configurable one.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::TransportError;

/// A biased exponent of zero marks a subnormal value (no implicit leading bit).
pub const EXP_SUBNORMAL: u32 = 0;
/// The smallest biased exponent of a normal value.
pub const EXP_MIN_NORMAL: u32 = 1;
/// The bias added to the unbiased exponent to obtain the stored, biased one.
pub const EXP_BIAS: u32 = 0x7FFF_FFFF;
/// Alias for [`EXP_BIAS`]: the biased exponent of `1.0`.
pub const EXP_ONE: u32 = EXP_BIAS;
/// The largest biased exponent of a finite value.
pub const EXP_MAX_VALUE: u32 = 0xFFFF_FFFE;
/// The biased exponent reserved for infinities and NaN.
pub const EXP_INFINITY: u32 = 0xFFFF_FFFF;

/// A software quadruple-precision floating-point number: one sign bit, a
/// 32-bit biased binary exponent, and a 128-bit fractional mantissa split
/// across two 64-bit words (`mant_hi` most significant).
///
/// `Quad` is a plain `Copy` aggregate; every arithmetic operation takes its
/// operands by value and returns a new `Quad` rather than mutating shared
/// state, except for the small set of methods explicitly documented as
/// taking `&mut self`.
#[derive(Clone, Copy)]
pub struct Quad {
    pub(crate) negative: bool,
    pub(crate) exponent: u32,
    pub(crate) mant_hi: u64,
    pub(crate) mant_lo: u64,
}

impl Quad {
    // ---- constant constructors -------------------------------------------------

    /// Positive zero.
    pub const fn zero() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_SUBNORMAL,
            mant_hi: 0,
            mant_lo: 0,
        }
    }

    /// `1.0`.
    pub const fn one() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_ONE,
            mant_hi: 0,
            mant_lo: 0,
        }
    }

    /// `2.0`.
    pub const fn two() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_ONE + 1,
            mant_hi: 0,
            mant_lo: 0,
        }
    }

    /// `10.0`.
    pub const fn ten() -> Quad {
        // 10 = 1.01b * 2^3, fractional part 0.01b = 0.25
        Quad {
            negative: false,
            exponent: EXP_ONE + 3,
            mant_hi: 0x4000_0000_0000_0000,
            mant_lo: 0,
        }
    }

    /// Archimedes' constant, to the full precision this type can carry.
    ///
    /// Unlike the other named constants, pi's mantissa bits are not a
    /// "nice" power-of-two fraction, so rather than hand-transcribe a
    /// 128-bit literal this is produced by parsing a 45-digit decimal
    /// literal through the same decimal parser every other string goes
    /// through (see [`crate::decimal`]).
    pub fn pi() -> Quad {
        "3.14159265358979323846264338327950288419717"
            .parse()
            .expect("pi literal is well-formed")
    }

    /// The smallest positive subnormal value.
    pub const fn min_value() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_SUBNORMAL,
            mant_hi: 0,
            mant_lo: 1,
        }
    }

    /// The smallest positive normal value.
    pub const fn min_normal() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_MIN_NORMAL,
            mant_hi: 0,
            mant_lo: 0,
        }
    }

    /// The largest finite value.
    pub const fn max_value() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_MAX_VALUE,
            mant_hi: u64::MAX,
            mant_lo: u64::MAX,
        }
    }

    /// The canonical NaN. Any `(EXP_INFINITY, mantissa != 0)` bit pattern
    /// is recognized as NaN on input, but values this type *produces* always
    /// use this exact pattern.
    pub const fn nan() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_INFINITY,
            mant_hi: 0x8000_0000_0000_0000,
            mant_lo: 0,
        }
    }

    pub const fn positive_infinity() -> Quad {
        Quad {
            negative: false,
            exponent: EXP_INFINITY,
            mant_hi: 0,
            mant_lo: 0,
        }
    }

    pub const fn negative_infinity() -> Quad {
        Quad {
            negative: true,
            exponent: EXP_INFINITY,
            mant_hi: 0,
            mant_lo: 0,
        }
    }

    // ---- raw constructors -------------------------------------------------

    /// Builds a `Quad` directly from its stored fields. The biased exponent
    /// and mantissa are stored verbatim; the caller is responsible for
    /// supplying a self-consistent triple, mirroring the host's
    /// `f64::from_bits`.
    pub const fn from_raw_biased(negative: bool, exponent: u32, mant_hi: u64, mant_lo: u64) -> Quad {
        Quad {
            negative,
            exponent,
            mant_hi,
            mant_lo,
        }
    }

    /// Builds a `Quad` from an unbiased exponent, applying [`EXP_BIAS`].
    /// `unbiased_exponent` is clamped into the representable biased range
    /// rather than panicking on out-of-range input.
    pub fn from_raw_unbiased(negative: bool, unbiased_exponent: i64, mant_hi: u64, mant_lo: u64) -> Quad {
        let biased = unbiased_exponent.saturating_add(EXP_BIAS as i64);
        let biased = biased.clamp(EXP_MIN_NORMAL as i64, EXP_MAX_VALUE as i64) as u32;
        Quad {
            negative,
            exponent: biased,
            mant_hi,
            mant_lo,
        }
    }

    /// Builds a `Quad` from the three-word transport format (see crate docs).
    pub fn from_words(words: [u64; 3]) -> Result<Quad, TransportError> {
        let [w0, mant_hi, mant_lo] = words;
        if w0 & 0x7FFF_FFFF_0000_0000 != 0 {
            return Err(TransportError::ReservedBitsSet);
        }
        let negative = w0 & (1 << 63) != 0;
        let exponent = (w0 & 0xFFFF_FFFF) as u32;
        Ok(Quad {
            negative,
            exponent,
            mant_hi,
            mant_lo,
        })
    }

    /// The inverse of [`Quad::from_words`].
    pub fn to_words(self) -> [u64; 3] {
        let mut w0 = self.exponent as u64;
        if self.negative {
            w0 |= 1 << 63;
        }
        [w0, self.mant_hi, self.mant_lo]
    }

    /// [`Quad::from_words`] over a runtime-length slice, for callers reading
    /// the three-word transport format out of a buffer whose length was not
    /// already checked by the type system.
    pub fn from_word_slice(words: &[u64]) -> Result<Quad, TransportError> {
        let arr: [u64; 3] = words.try_into().map_err(|_| TransportError::InvalidLength {
            expected: 3,
            actual: words.len(),
        })?;
        Quad::from_words(arr)
    }

    /// The three-word transport format as 24 big-endian bytes.
    pub fn to_transport_bytes(self) -> [u8; 24] {
        let [w0, hi, lo] = self.to_words();
        let mut out = [0u8; 24];
        out[0..8].copy_from_slice(&w0.to_be_bytes());
        out[8..16].copy_from_slice(&hi.to_be_bytes());
        out[16..24].copy_from_slice(&lo.to_be_bytes());
        out
    }

    /// The inverse of [`Quad::to_transport_bytes`], over a runtime-length slice.
    pub fn from_transport_bytes(bytes: &[u8]) -> Result<Quad, TransportError> {
        if bytes.len() != 24 {
            return Err(TransportError::InvalidLength { expected: 24, actual: bytes.len() });
        }
        let word = |i: usize| u64::from_be_bytes(bytes[i * 8..i * 8 + 8].try_into().unwrap());
        Quad::from_words([word(0), word(1), word(2)])
    }

    // ---- accessors -------------------------------------------------

    pub const fn is_negative_bit(self) -> bool {
        self.negative
    }

    /// The stored, biased exponent.
    pub const fn exponent(self) -> u32 {
        self.exponent
    }

    /// The unbiased exponent. Meaningless for subnormals (callers should
    /// check [`Quad::is_subnormal`] first); returned as `EXP_MIN_NORMAL -
    /// EXP_BIAS` for those by convention, matching a normal value pinned at
    /// the smallest normal exponent.
    pub fn unbiased_exponent(self) -> i64 {
        let e = if self.exponent == EXP_SUBNORMAL {
            EXP_MIN_NORMAL
        } else {
            self.exponent
        };
        e as i64 - EXP_BIAS as i64
    }

    pub const fn mant_hi(self) -> u64 {
        self.mant_hi
    }

    pub const fn mant_lo(self) -> u64 {
        self.mant_lo
    }

    /// The 128-bit fractional mantissa as a single integer (no implicit bit).
    pub const fn mantissa_bits(self) -> u128 {
        ((self.mant_hi as u128) << 64) | self.mant_lo as u128
    }

    // ---- predicates -------------------------------------------------

    pub const fn is_zero(self) -> bool {
        self.exponent == EXP_SUBNORMAL && self.mant_hi == 0 && self.mant_lo == 0
    }

    pub const fn is_negative(self) -> bool {
        self.negative
    }

    pub const fn is_nan(self) -> bool {
        self.exponent == EXP_INFINITY && (self.mant_hi != 0 || self.mant_lo != 0)
    }

    pub const fn is_infinite(self) -> bool {
        self.exponent == EXP_INFINITY && self.mant_hi == 0 && self.mant_lo == 0
    }

    pub const fn is_finite(self) -> bool {
        self.exponent != EXP_INFINITY
    }

    pub const fn is_normal(self) -> bool {
        self.exponent != EXP_SUBNORMAL && self.exponent != EXP_INFINITY
    }

    pub const fn is_subnormal(self) -> bool {
        self.exponent == EXP_SUBNORMAL && !self.is_zero()
    }

    /// `-1` for negative values (including `-0`), `0` for `+0`, `1` for
    /// positive values, `NaN` for `NaN`.
    pub fn signum(self) -> Quad {
        if self.is_nan() {
            return Quad::nan();
        }
        if self.is_zero() {
            return if self.negative { Quad::one().negated() } else { Quad::zero() };
        }
        if self.negative {
            Quad::one().negated()
        } else {
            Quad::one()
        }
    }

    // ---- mutation -------------------------------------------------

    /// Flips the sign bit in place.
    pub fn negate(&mut self) {
        self.negative = !self.negative;
    }

    /// Returns a copy with the sign bit flipped.
    pub fn negated(self) -> Quad {
        let mut q = self;
        q.negate();
        q
    }

    /// Sets `self` to whichever of `self`/`other` compares greater.
    pub fn assign_max(&mut self, other: Quad) {
        if other.compare_to(*self) == Ordering::Greater {
            *self = other;
        }
    }

    /// Sets `self` to whichever of `self`/`other` compares lesser.
    pub fn assign_min(&mut self, other: Quad) {
        if other.compare_to(*self) == Ordering::Less {
            *self = other;
        }
    }

    // ---- comparisons -------------------------------------------------

    /// Compares magnitudes only (sign and NaN status ignored); only
    /// meaningful when both operands are finite.
    pub(crate) fn compare_magnitude_to(self, other: Quad) -> Ordering {
        self.exponent
            .cmp(&other.exponent)
            .then(self.mant_hi.cmp(&other.mant_hi))
            .then(self.mant_lo.cmp(&other.mant_lo))
    }

    /// The total order described in the crate's invariants: NaN compares
    /// greater than everything (including other NaNs, to which it compares
    /// equal), and `-0 < +0`.
    pub fn compare_to(self, other: Quad) -> Ordering {
        match (self.is_nan(), other.is_nan()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        match (self.is_zero(), other.is_zero()) {
            (true, true) => {
                return match (self.negative, other.negative) {
                    (a, b) if a == b => Ordering::Equal,
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => unreachable!(),
                };
            }
            (true, false) => return if other.negative { Ordering::Greater } else { Ordering::Less },
            (false, true) => return if self.negative { Ordering::Less } else { Ordering::Greater },
            (false, false) => {}
        }
        match (self.negative, other.negative) {
            (false, false) => self.compare_magnitude_to(other),
            (true, true) => other.compare_magnitude_to(self),
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
        }
    }
}

impl Default for Quad {
    fn default() -> Quad {
        Quad::zero()
    }
}

impl PartialEq for Quad {
    fn eq(&self, other: &Self) -> bool {
        self.compare_to(*other) == Ordering::Equal
    }
}

impl Eq for Quad {}

impl PartialOrd for Quad {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_to(*other))
    }
}

impl Ord for Quad {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(*other)
    }
}

impl Hash for Quad {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_nan() {
            // every NaN must hash identically since they all compare equal
            0xFA_u8.hash(state);
            return;
        }
        self.negative.hash(state);
        self.exponent.hash(state);
        self.mant_hi.hash(state);
        self.mant_lo.hash(state);
    }
}

impl std::ops::Neg for Quad {
    type Output = Quad;
    fn neg(self) -> Quad {
        self.negated()
    }
}

impl std::fmt::Debug for Quad {
    /// A fixed-width hexadecimal diagnostic string, distinct from the
    /// decimal `Display` form so that subnormals and NaN payloads are never
    /// ambiguous.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{:04x}_{:04x}_{:04x}_{:04x} {:04x}_{:04x}_{:04x}_{:04x} e{:04x}_{:04x}",
            if self.negative { "-" } else { "+" },
            (self.mant_hi >> 48) & 0xFFFF,
            (self.mant_hi >> 32) & 0xFFFF,
            (self.mant_hi >> 16) & 0xFFFF,
            self.mant_hi & 0xFFFF,
            (self.mant_lo >> 48) & 0xFFFF,
            (self.mant_lo >> 32) & 0xFFFF,
            (self.mant_lo >> 16) & 0xFFFF,
            self.mant_lo & 0xFFFF,
            (self.exponent >> 16) & 0xFFFF,
            self.exponent & 0xFFFF,
        )
    }
}
