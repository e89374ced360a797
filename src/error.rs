//! Structured error types returned by the parser, the transport codecs,
//! and the arbitrary-precision decimal bridge.
//!
//! Arithmetic itself never fails (see [`crate::value::Quad`]'s docs): only
//! the boundary-crossing conversions in [`crate::decimal`] and
//! [`crate::codec`] can.

use thiserror::Error;

/// Failure to parse a decimal string into a [`crate::value::Quad`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input string is empty. Rust's non-nullable `&str` makes a
    /// true null argument unrepresentable, so this stands in for it.
    #[error("cannot parse a Quad from an empty string")]
    Empty,

    /// The input does not match the accepted decimal grammar.
    #[error("invalid number format: {0:?}")]
    NumberFormat(String),
}

/// Failure to convert a [`crate::value::Quad`] to an arbitrary-precision decimal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    /// NaN and the infinities have no decimal representation.
    #[error("value is not finite")]
    NotFinite,
}

/// Failure to decode a fixed-size transport encoding.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The supplied slice did not have the expected length.
    #[error("invalid transport length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The reserved bits of the three-word transport format (word 0, bits
    /// 62..32) were not zero.
    #[error("reserved bits of word 0 must be zero")]
    ReservedBitsSet,
}
