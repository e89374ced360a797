//! Powers of two, computed once to bounded decimal precision and cached,
//! for rescaling between a `Quad`'s binary exponent and its decimal
//! representation.
//!
//! The upstream source this crate's design was distilled from hardcodes a
//! `POS_POWERS_OF_2`/`NEG_POWERS_OF_2` table of published constants; those
//! exact values did not survive the distillation (see `DESIGN.md`), so
//! this port computes the same mathematical table from exact integer
//! arithmetic via repeated squaring instead of transcribing magic hex
//! literals. An arbitrary `2^n` is then synthesized by decomposing `n`
//! into its binary expansion and multiplying together the table entries
//! selected by its set bits, exactly as the source's own "multiply the
//! matching table rows" approach works, just computed rather than looked
//! up from a literal.

use std::sync::OnceLock;

use bigdecimal::BigDecimal;

/// Decimal digits of precision carried through every power-of-two lookup
/// and rescale — comfortably more than the ~39 significant decimal digits
/// a 128-bit binary fraction can distinguish.
pub(crate) const PRECISION: u64 = 100;

/// `k` such that the table holds entries for `2^(2^0) .. 2^(2^(ENTRIES-1))`,
/// enough to synthesize any exponent this crate's 32-bit biased exponent
/// field can express.
const ENTRIES: usize = 33;

struct Pow2Table {
    /// `rows[k] = (2^(2^k), 2^-(2^k))`, each rounded to [`PRECISION`] digits.
    rows: Vec<(BigDecimal, BigDecimal)>,
}

static TABLE: OnceLock<Pow2Table> = OnceLock::new();

fn table() -> &'static Pow2Table {
    TABLE.get_or_init(|| {
        let mut rows = Vec::with_capacity(ENTRIES);
        let mut pos = BigDecimal::from(2);
        let mut neg = BigDecimal::from(1) / BigDecimal::from(2);
        for _ in 0..ENTRIES {
            rows.push((pos.clone(), neg.clone()));
            pos = (&pos * &pos).with_prec(PRECISION);
            neg = (&neg * &neg).with_prec(PRECISION);
        }
        Pow2Table { rows }
    })
}

/// `2^exp`, accurate to [`PRECISION`] significant decimal digits.
///
/// `exp` is expected to fall within the range a `Quad`'s unbiased
/// exponent can take (roughly `±2^32`); larger magnitudes silently drop
/// their high bits rather than panicking, since no valid caller ever
/// passes one.
pub(crate) fn pow2_quasi(exp: i64) -> BigDecimal {
    let negative = exp < 0;
    let mut mag = exp.unsigned_abs();
    let rows = &table().rows;

    let mut result = BigDecimal::from(1);
    for row in rows.iter() {
        if mag & 1 == 1 {
            let factor = if negative { &row.1 } else { &row.0 };
            result = (&result * factor).with_prec(PRECISION);
        }
        mag >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn pow2_zero_is_one() {
        assert_eq!(pow2_quasi(0), BigDecimal::from(1));
    }

    #[test]
    fn pow2_small_matches_literal() {
        assert_eq!(pow2_quasi(10), BigDecimal::from(1024));
        assert_eq!(pow2_quasi(-1), BigDecimal::from_str("0.5").unwrap());
    }

    #[test]
    fn pow2_inverse_round_trips_near_one() {
        let big = pow2_quasi(77);
        let small = pow2_quasi(-77);
        let product = (&big * &small).with_prec(PRECISION);
        let diff = (&product - BigDecimal::from(1)).abs();
        assert!(diff < BigDecimal::from_str("1e-90").unwrap());
    }
}
