//! Universal invariants that hold across every operation, not just the
//! handful of representative inputs each module's own unit tests exercise.

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::value::EXP_INFINITY;
use crate::Quad;

/// A small set of representative finite values the property tests fold
/// over; deliberately includes a negative value, an integer, and an
/// irrational one rather than just `1.0` and `2.0`.
fn sample_values() -> Vec<Quad> {
    vec![Quad::pi(), Quad::ten(), Quad::one().negated(), Quad::two(), Quad::min_normal(), Quad::zero()]
}

fn hash_of(q: Quad) -> u64 {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    q.hash(&mut h);
    h.finish()
}

/// `2^-129` as a decimal upper bound, slightly looser than the exact value
/// (`~1.4694e-39`) so the comparison never fails on the threshold's own
/// representation noise.
fn relative_error_bound() -> BigDecimal {
    BigDecimal::from_str("1.5e-39").unwrap()
}

fn relative_error(exact: &BigDecimal, actual: &BigDecimal) -> BigDecimal {
    if *exact == BigDecimal::from(0) {
        return actual.abs();
    }
    ((exact - actual) / exact).abs()
}

#[test]
fn representation_invariant_holds_after_every_arithmetic_op() {
    let values = sample_values();
    for &a in &values {
        for &b in &values {
            for r in [a.add(b), a.sub(b), a.mul(b), a.div(b)] {
                if r.exponent() == EXP_INFINITY {
                    assert!(r.is_infinite() || r.is_nan());
                } else {
                    assert!(!r.is_nan());
                }
            }
        }
    }
}

#[test]
fn round_trip_string_for_finite_nonzero_values() {
    for v in [Quad::pi(), Quad::ten(), Quad::one().negated(), Quad::min_normal(), Quad::max_value()] {
        let s = v.to_string();
        assert_eq!(s.parse::<Quad>().unwrap(), v, "round-trip failed for {s}");
    }
    assert!("NaN".parse::<Quad>().unwrap().is_nan());
    assert_eq!("Infinity".parse::<Quad>().unwrap(), Quad::positive_infinity());
    assert_eq!("-Infinity".parse::<Quad>().unwrap(), Quad::negative_infinity());
}

#[test]
fn round_trip_arbitrary_decimal_for_finite_non_negative_zero_values() {
    for v in [Quad::pi(), Quad::ten(), Quad::one().negated(), Quad::min_normal(), Quad::zero(), Quad::max_value()] {
        let d = v.to_big_decimal().unwrap();
        assert_eq!(Quad::from_big_decimal(&d), v);
    }
}

#[test]
fn relative_error_bound_holds_for_add_sub_mul() {
    let a = Quad::pi();
    let b = Quad::from_str("1.41421356237309504880168872420969807856967").unwrap();
    let a_exact = a.to_big_decimal().unwrap();
    let b_exact = b.to_big_decimal().unwrap();
    let bound = relative_error_bound();

    let add_exact = &a_exact + &b_exact;
    assert!(relative_error(&add_exact, &a.add(b).to_big_decimal().unwrap()) <= bound);

    let sub_exact = &a_exact - &b_exact;
    assert!(relative_error(&sub_exact, &a.sub(b).to_big_decimal().unwrap()) <= bound);

    let mul_exact = &a_exact * &b_exact;
    assert!(relative_error(&mul_exact, &a.mul(b).to_big_decimal().unwrap()) <= bound);
}

#[test]
fn relative_error_bound_holds_for_div() {
    let one = Quad::one();
    let seven: Quad = "7".parse().unwrap();
    let exact = BigDecimal::from(1) / BigDecimal::from(7);
    let actual = one.div(seven).to_big_decimal().unwrap();
    assert!(relative_error(&exact, &actual) <= relative_error_bound());
}

#[test]
fn relative_error_bound_holds_for_sqrt() {
    let two = Quad::two();
    let exact = BigDecimal::from(2).sqrt().expect("2 is non-negative");
    let actual = two.sqrt().to_big_decimal().unwrap();
    assert!(relative_error(&exact, &actual) <= relative_error_bound());
}

#[test]
fn identity_laws_hold_for_every_finite_value() {
    for v in [Quad::pi(), Quad::ten(), Quad::one().negated(), Quad::two()] {
        assert_eq!(v.add(Quad::zero()), v);
        assert_eq!(v.sub(Quad::zero()), v);
        assert_eq!(v.mul(Quad::one()), v);
        assert_eq!(v.div(Quad::one()), v);

        let z = v.mul(Quad::zero());
        assert!(z.is_zero());
        assert_eq!(z.is_negative(), v.is_negative());
    }
    assert_eq!(Quad::one().sqrt(), Quad::one());
}

#[test]
fn sign_laws_for_zero() {
    let pos = Quad::zero();
    let neg = Quad::zero().negated();

    assert!(pos.add(pos).is_zero() && !pos.add(pos).is_negative());
    assert!(neg.add(neg).is_zero() && neg.add(neg).is_negative());
    assert!(pos.add(neg).is_zero() && !pos.add(neg).is_negative());
    assert!(pos.sub(pos).is_zero() && !pos.sub(pos).is_negative());
    assert!(neg.sub(pos).is_zero() && neg.sub(pos).is_negative());

    let v = Quad::pi();
    assert_eq!(neg.mul(v), v.negated());
    assert_eq!(neg.mul(v.negated()), v);
}

#[test]
fn comparison_is_a_total_order_over_a_mixed_sample() {
    let values = [Quad::nan(), Quad::positive_infinity(), Quad::pi(), Quad::zero(), Quad::zero().negated(), Quad::one().negated(), Quad::negative_infinity()];

    for &a in &values {
        assert_eq!(a.compare_to(a), std::cmp::Ordering::Equal, "reflexivity failed for {a:?}");
    }
    for &a in &values {
        for &b in &values {
            assert_eq!(a.compare_to(b).reverse(), b.compare_to(a), "antisymmetry failed for {a:?}, {b:?}");
        }
    }
    for &a in &values {
        for &b in &values {
            for &c in &values {
                if a.compare_to(b).is_le() && b.compare_to(c).is_le() {
                    assert!(a.compare_to(c).is_le(), "transitivity failed for {a:?}, {b:?}, {c:?}");
                }
            }
        }
    }

    assert_eq!(Quad::nan().compare_to(Quad::nan()), std::cmp::Ordering::Equal);
    assert_eq!(Quad::nan().compare_to(Quad::pi()), std::cmp::Ordering::Greater);
    assert_eq!(Quad::zero().negated().compare_to(Quad::zero()), std::cmp::Ordering::Less);
}

#[test]
fn equal_values_hash_identically() {
    assert_eq!(hash_of(Quad::pi()), hash_of(Quad::pi()));
    assert_eq!(hash_of(Quad::zero()), hash_of(Quad::zero()));

    // distinct NaN bit patterns must still hash identically.
    let nan_a = Quad::from_raw_biased(false, EXP_INFINITY, 1, 0);
    let nan_b = Quad::from_raw_biased(true, EXP_INFINITY, 0, 42);
    assert_eq!(hash_of(nan_a), hash_of(nan_b));
    assert_eq!(hash_of(nan_a), hash_of(Quad::nan()));
}

#[test]
fn add_and_mul_are_commutative() {
    let values = sample_values();
    for &a in &values {
        for &b in &values {
            assert_eq!(a.add(b), b.add(a), "add not commutative for {a:?}, {b:?}");
            assert_eq!(a.mul(b), b.mul(a), "mul not commutative for {a:?}, {b:?}");
        }
    }
}

#[test]
fn sqrt_spec_bound_holds() {
    for v in [Quad::two(), Quad::ten(), Quad::pi(), Quad::from_str("0.0001").unwrap()] {
        let r = v.sqrt();
        let err = r.mul(r).sub(v);
        let bound = v.mul(Quad::from_str("1.5e-39").unwrap());
        assert!(err.add(bound).compare_to(Quad::zero()).is_ge(), "sqrt bound failed for {v:?}");
        assert!(bound.sub(err).compare_to(Quad::zero()).is_ge(), "sqrt bound failed for {v:?}");
    }
}
