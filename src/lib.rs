//! A software quadruple-precision floating-point number (`Quad`): a sign
//! bit, a 32-bit biased binary exponent, and a 128-bit fractional mantissa.
//!
//! - `value` (C1) — the `Quad` aggregate, its bit layout, predicates, and
//!   total ordering.
//! - `arith` (C2) — add/sub/mul/div.
//! - `sqrt` (C3) — square root.
//! - `decimal` (C4) — `Display`/`FromStr` and the `bigdecimal` bridge.
//! - `codec` (C5) — host `f64`/`i64`/`i32` conversions, IEEE-754 binary128
//!   transport, and random generation.
//!
//! Arithmetic itself never fails or panics: every operation is total over
//! its domain, following IEEE-754-style conventions for NaN, the
//! infinities, and signed zero (see [`value::Quad`]'s own docs for the
//! exact rules). Only the boundary-crossing conversions in `decimal` and
//! the transport codecs in `codec` return `Result`.

mod arith;
mod codec;
mod decimal;
mod error;
mod sqrt;
mod value;
mod wide;

pub use codec::{random_quad, uniform_random_quad};
pub use error::{ConvertError, ParseError, TransportError};
pub use value::{Quad, EXP_BIAS, EXP_INFINITY, EXP_MAX_VALUE, EXP_MIN_NORMAL, EXP_ONE, EXP_SUBNORMAL};

impl Quad {
    /// `self + other`.
    pub fn add(self, other: Quad) -> Quad {
        arith::add(self, other)
    }

    /// `self - other`.
    pub fn sub(self, other: Quad) -> Quad {
        arith::add(self, other.negated())
    }

    /// `self * other`.
    pub fn mul(self, other: Quad) -> Quad {
        arith::mul(self, other)
    }

    /// `self / other`.
    pub fn div(self, other: Quad) -> Quad {
        arith::div(self, other)
    }

    /// The nonnegative square root. NaN for negative, non-zero inputs.
    pub fn sqrt(self) -> Quad {
        sqrt::sqrt(self)
    }
}

impl std::ops::Add for Quad {
    type Output = Quad;
    fn add(self, rhs: Quad) -> Quad {
        arith::add(self, rhs)
    }
}

impl std::ops::Sub for Quad {
    type Output = Quad;
    fn sub(self, rhs: Quad) -> Quad {
        arith::add(self, rhs.negated())
    }
}

impl std::ops::Mul for Quad {
    type Output = Quad;
    fn mul(self, rhs: Quad) -> Quad {
        arith::mul(self, rhs)
    }
}

impl std::ops::Div for Quad {
    type Output = Quad;
    fn div(self, rhs: Quad) -> Quad {
        arith::div(self, rhs)
    }
}
