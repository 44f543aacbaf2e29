//! # pike-field
//!
//! Finite-field arithmetic for the Pike admission protocol.
//!
//! Every protocol value (nullifier, ticket index, share coordinate,
//! identity secret) is an element of the 252-bit prime field used by the
//! spend circuit, `P = 2^251 + 17 * 2^192 + 1`. This crate fixes that
//! field and implements the share algebra on top of it. No other field is
//! supported.
//!
//! ## Modules
//!
//! - [`felt`] — the field element type, literal parsing, Fermat inversion,
//!   canonical hex encoding
//! - [`recovery`] — identity-secret recovery from two conflicting shares

pub mod felt;
pub mod recovery;

pub use felt::Felt;

/// Error types for field operations.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// Input text is not a decimal or `0x`-prefixed hexadecimal integer.
    #[error("invalid field element literal: {0:?}")]
    Malformed(String),

    /// Zero has no multiplicative inverse.
    #[error("inverse does not exist for 0 in field")]
    ZeroInverse,

    /// Both interpolation points evaluate the polynomial at the same x.
    #[error("x1 and x2 are equal; a0 recovery requires two distinct messages")]
    DuplicatePoint,

    /// The share evaluates the polynomial at x = 0.
    #[error("cannot derive a1 when x == 0")]
    ZeroPoint,
}

pub type Result<T> = std::result::Result<T, FieldError>;
