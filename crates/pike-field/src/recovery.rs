//! Identity-secret recovery from conflicting shares.
//!
//! A spend share is a point `(x, A(x))` on the client's degree-1 share
//! polynomial `A(X) = a0 + a1 * X`, where `a0` is the identity secret.
//! One point reveals nothing; two points with distinct x determine the
//! line, which is what makes double-spending a ticket self-incriminating:
//!
//! ```text
//! a0 = (y1 * x2 - y2 * x1) / (x2 - x1)
//! ```

use crate::felt::{self, Felt};
use crate::{FieldError, Result};

/// Recover the identity secret `a0` from two shares of the same ticket.
///
/// # Errors
///
/// Returns [`FieldError::DuplicatePoint`] when both shares evaluate the
/// polynomial at the same x, which pins down no line.
pub fn recover_identity_secret(x1: Felt, y1: Felt, x2: Felt, y2: Felt) -> Result<Felt> {
    if x1 == x2 {
        return Err(FieldError::DuplicatePoint);
    }
    let numerator = y1 * x2 - y2 * x1;
    Ok(numerator * felt::inverse(&(x2 - x1))?)
}

/// Derive the slope `a1` from one share once `a0` is known.
///
/// # Errors
///
/// Returns [`FieldError::ZeroPoint`] when the share's x is zero, where
/// the slope does not contribute to y.
pub fn derive_slope(a0: Felt, x: Felt, y: Felt) -> Result<Felt> {
    if x == Felt::from(0u64) {
        return Err(FieldError::ZeroPoint);
    }
    Ok((y - a0) * felt::inverse(&x)?)
}
