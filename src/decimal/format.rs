//! `Quad -> String` decimal formatting (C4): `Display`.
//!
//! Every finite nonzero value renders as `[-]D.{39 digits}e±EE`, the full
//! 40 significant digits this type's ~38.5 decimal digits of binary
//! precision can actually distinguish: round the exact (to the
//! powers-of-two table's bounded precision) `BigDecimal` view of the
//! value's magnitude to 40 significant digits and read off its decimal
//! exponent, rather than hand-rolling the repeated-multiply-by-ten digit
//! extraction loop the source uses — `BigDecimal::with_scale_round`
//! already is that loop, done in one step instead of forty.

use std::fmt;

use bigdecimal::RoundingMode;

use super::bigdec;
use crate::value::Quad;

/// Significant decimal digits carried in the formatted string: one more
/// than this type's mantissa needs to round-trip exactly.
const SIGNIFICANT_DIGITS: i64 = 40;

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return f.write_str("NaN");
        }
        if self.is_infinite() {
            return f.write_str(if self.is_negative() { "-Infinity" } else { "Infinity" });
        }
        if self.is_zero() {
            return f.write_str(if self.is_negative() { "-0.0" } else { "0.0" });
        }

        let magnitude = if self.is_negative() { self.negated() } else { *self };
        let exact = bigdec::to_big_decimal(&magnitude).expect("checked finite above");
        let (digits, exp) = round_to_significant_digits(&exact, SIGNIFICANT_DIGITS);

        let mut out = String::with_capacity(digits.len() + 8);
        if self.is_negative() {
            out.push('-');
        }
        out.push(digits.as_bytes()[0] as char);
        out.push('.');
        out.push_str(&digits[1..]);
        out.push('e');
        out.push(if exp >= 0 { '+' } else { '-' });
        out.push_str(&format!("{:02}", exp.abs()));
        f.write_str(&out)
    }
}

/// Rounds a positive `BigDecimal` to exactly `n` significant digits
/// (round-half-up on the `n+1`th digit), returning the digit string and
/// the decimal exponent of its leading digit. Handles the carry case
/// where rounding turns `9.99...9` into `10.00...0`.
fn round_to_significant_digits(value: &bigdecimal::BigDecimal, n: i64) -> (String, i64) {
    let (digits, scale) = value.as_bigint_and_exponent();
    let ndigits = digits.to_string().len() as i64;
    let decimal_exp = ndigits - 1 - scale;

    let round_scale = n - 1 - decimal_exp;
    let rounded = value.with_scale_round(round_scale, RoundingMode::HalfUp);
    let (rounded_digits, rounded_scale) = rounded.as_bigint_and_exponent();
    let mut digit_str = rounded_digits.to_string();
    let rounded_ndigits = digit_str.len() as i64;
    let final_exp = rounded_ndigits - 1 - rounded_scale;

    if rounded_ndigits > n {
        digit_str.truncate(n as usize);
    } else if rounded_ndigits < n {
        digit_str.push_str(&"0".repeat((n - rounded_ndigits) as usize));
    }

    (digit_str, final_exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_named_specials() {
        assert_eq!(Quad::nan().to_string(), "NaN");
        assert_eq!(Quad::positive_infinity().to_string(), "Infinity");
        assert_eq!(Quad::negative_infinity().to_string(), "-Infinity");
        assert_eq!(Quad::zero().to_string(), "0.0");
        assert_eq!(Quad::zero().negated().to_string(), "-0.0");
    }

    #[test]
    fn formats_one_with_forty_digits() {
        let s = Quad::one().to_string();
        assert!(s.starts_with("1.0"));
        assert!(s.ends_with("e+00"));
        // "D." + 39 fractional digits + "e+00"
        assert_eq!(s.len(), 1 + 1 + 39 + 4);
    }

    #[test]
    fn formats_ten_with_correct_exponent() {
        let s = Quad::ten().to_string();
        assert!(s.starts_with("1.0"));
        assert!(s.ends_with("e+01"));
    }

    #[test]
    fn negative_values_carry_a_leading_sign() {
        let s = Quad::ten().negated().to_string();
        assert!(s.starts_with("-1.0"));
    }

    #[test]
    fn end_to_end_product_matches_documented_digits() {
        let a: Quad = "5.5".parse().unwrap();
        let b: Quad = "5.5".parse().unwrap();
        let pi: Quad = "3.141592653589793238462643383279502884195".parse().unwrap();
        let r = crate::arith::mul(crate::arith::mul(a, b), pi);
        assert_eq!(r.to_string(), "9.503317777109124546349496234420496224688e+01");
    }

    #[test]
    fn sqrt_two_matches_documented_digits() {
        let two: Quad = "2".parse().unwrap();
        assert_eq!(crate::sqrt::sqrt(two).to_string(), "1.414213562373095048801688724209698078570e+00");
    }
}
