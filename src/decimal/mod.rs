//! Decimal string and arbitrary-precision bridge (C4).
//!
//! `Quad` values format (`Display`) and parse (`FromStr`) through an
//! exact, bounded-precision `bigdecimal::BigDecimal` view of their value;
//! see `bigdec` for that bridge and `quasi` for the powers-of-two table it
//! rescales by.

mod bigdec;
mod format;
mod parse;
mod quasi;

use bigdecimal::BigDecimal;

use crate::error::ConvertError;
use crate::value::Quad;

impl Quad {
    /// The exact (to bounded precision) value as an arbitrary-precision
    /// decimal. `Err` for NaN and the infinities, which have none.
    pub fn to_big_decimal(&self) -> Result<BigDecimal, ConvertError> {
        bigdec::to_big_decimal(self)
    }

    /// The `Quad` nearest `d`'s value. Never fails: out-of-range magnitudes
    /// saturate to infinity or zero exactly as every other operation does.
    pub fn from_big_decimal(d: &BigDecimal) -> Quad {
        bigdec::from_big_decimal(d)
    }
}

/// Infallible: any decimal value maps to some `Quad` (possibly ±∞ or ±0).
impl From<&BigDecimal> for Quad {
    fn from(d: &BigDecimal) -> Quad {
        Quad::from_big_decimal(d)
    }
}

impl TryFrom<&Quad> for BigDecimal {
    type Error = ConvertError;

    fn try_from(q: &Quad) -> Result<BigDecimal, ConvertError> {
        q.to_big_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_big_decimal_trait_matches_inherent_method() {
        let d = BigDecimal::from(42);
        assert_eq!(Quad::from(&d), Quad::from_big_decimal(&d));
    }

    #[test]
    fn try_from_quad_rejects_non_finite() {
        assert_eq!(BigDecimal::try_from(&Quad::nan()), Err(ConvertError::NotFinite));
    }

    #[test]
    fn try_from_quad_accepts_finite() {
        let d = BigDecimal::try_from(&Quad::ten()).unwrap();
        assert_eq!(d, BigDecimal::from(10));
    }
}
