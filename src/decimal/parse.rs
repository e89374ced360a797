//! `String -> Quad` decimal parsing (C4): `FromStr`, `TryFrom<&str>`, and
//! the named-constant grammar (`NaN`, `Infinity`, `MIN_VALUE`, ...).
//!
//! The numeric grammar itself is delegated to `bigdecimal::BigDecimal`'s
//! own parser (which already accepts the `[sign] digits [. digits] [e
//! sign digits]` shape this crate's grammar calls for) rather than
//! hand-rolled digit-by-digit, with [`super::bigdec::from_big_decimal`]
//! doing the binary conversion afterwards. Named constants are matched
//! ahead of the numeric path as a half-dozen-arm `match` — well below the
//! cardinality where the teacher's `phf` dependency would pay for itself,
//! so it is dropped here (see `DESIGN.md`).

use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::bigdec;
use crate::error::ParseError;
use crate::value::Quad;

impl FromStr for Quad {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Quad, ParseError> {
        let trimmed: String = s.trim().chars().filter(|c| *c != '_').collect();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        let body = trimmed.strip_prefix("quadruple.").unwrap_or(&trimmed);
        if let Some(q) = named_constant(body) {
            return Ok(q);
        }

        let parsed = BigDecimal::from_str(body).map_err(|_| ParseError::NumberFormat(s.to_string()))?;
        Ok(bigdec::from_big_decimal(&parsed))
    }
}

impl TryFrom<&str> for Quad {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Quad, ParseError> {
        s.parse()
    }
}

fn named_constant(body: &str) -> Option<Quad> {
    Some(match body {
        "NaN" | "nan" | "NAN" => Quad::nan(),
        "Infinity" | "+Infinity" | "infinity" => Quad::positive_infinity(),
        "-Infinity" | "-infinity" => Quad::negative_infinity(),
        "MIN_VALUE" | "min_value" => Quad::min_value(),
        "-MIN_VALUE" | "-min_value" => Quad::min_value().negated(),
        "MAX_VALUE" | "max_value" => Quad::max_value(),
        "-MAX_VALUE" | "-max_value" => Quad::max_value().negated(),
        "MIN_NORMAL" | "min_normal" => Quad::min_normal(),
        "-MIN_NORMAL" | "-min_normal" => Quad::min_normal().negated(),
        "-0" | "-0.0" => Quad::zero().negated(),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!("".parse::<Quad>(), Err(ParseError::Empty));
        assert_eq!("   ".parse::<Quad>(), Err(ParseError::Empty));
    }

    #[test]
    fn garbage_is_a_number_format_error() {
        assert!(matches!("not a number".parse::<Quad>(), Err(ParseError::NumberFormat(_))));
    }

    #[test]
    fn parses_named_constants() {
        assert!("NaN".parse::<Quad>().unwrap().is_nan());
        assert_eq!("Infinity".parse::<Quad>().unwrap(), Quad::positive_infinity());
        assert_eq!("-Infinity".parse::<Quad>().unwrap(), Quad::negative_infinity());
        assert_eq!("quadruple.MIN_VALUE".parse::<Quad>().unwrap(), Quad::min_value());
    }

    #[test]
    fn parses_negative_zero() {
        let z = "-0.0".parse::<Quad>().unwrap();
        assert!(z.is_zero());
        assert!(z.is_negative());
    }

    #[test]
    fn parses_plain_integers_and_decimals() {
        assert_eq!("10".parse::<Quad>().unwrap(), Quad::ten());
        assert_eq!("1".parse::<Quad>().unwrap(), Quad::one());
    }

    #[test]
    fn underscores_are_ignored() {
        assert_eq!("1_0".parse::<Quad>().unwrap(), Quad::ten());
    }

    #[test]
    fn round_trips_through_display() {
        let values = [Quad::pi(), Quad::ten(), Quad::one().negated(), Quad::min_normal()];
        for v in values {
            let s = v.to_string();
            let back: Quad = s.parse().unwrap();
            assert_eq!(back, v, "round-trip failed for {s}");
        }
    }

    #[test]
    fn min_value_packs_as_documented() {
        let q: Quad = "quadruple.MIN_VALUE".parse().unwrap();
        assert!(!q.is_negative());
        assert_eq!(q.exponent(), 0);
        assert_eq!(q.mant_hi(), 0);
        assert_eq!(q.mant_lo(), 1);
    }
}
