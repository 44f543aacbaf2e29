//! Untrusted share payload parsing.
//!
//! Submissions arrive as JSON. Every coordinate is normalized into the
//! admission field before anything downstream can see it, so mixed
//! encodings of the same value (decimal text, hex text, plain integer)
//! compare equal in the ledger.

use pike_field::{felt, Felt, FieldError};
use serde_json::{Map, Value};

use crate::{LedgerError, Result};

/// Keys a share payload must carry.
const REQUIRED_KEYS: [&str; 4] = ["nullifier", "ticket_index", "x", "y"];

/// One RLN spend share: a point on the client's share polynomial, bound
/// to a nullifier and a ticket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    /// Epoch-scoped spend identifier the ledger keys on.
    pub nullifier: Felt,
    /// Which rate-limit ticket this share spends.
    pub ticket_index: Felt,
    /// Evaluation point of the share polynomial.
    pub x: Felt,
    /// Evaluation result, `a0 + a1 * x`.
    pub y: Felt,
}

impl Share {
    /// Parse an untrusted JSON payload into a normalized share.
    ///
    /// Coordinates may be JSON integers or decimal / `0x`-hex strings;
    /// each is reduced into the field.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAnObject`] when the payload is not an object
    /// - [`LedgerError::MissingShareKeys`] listing absent keys, sorted
    /// - [`LedgerError::InvalidShareField`] naming the first key whose
    ///   value is not an integer literal
    pub fn from_json(raw: &Value) -> Result<Self> {
        let object = raw.as_object().ok_or(LedgerError::NotAnObject)?;

        let mut missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !object.contains_key(**key))
            .map(|key| (*key).to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(LedgerError::MissingShareKeys { keys: missing });
        }

        Ok(Self {
            nullifier: field_value(object, "nullifier")?,
            ticket_index: field_value(object, "ticket_index")?,
            x: field_value(object, "x")?,
            y: field_value(object, "y")?,
        })
    }
}

fn field_value(object: &Map<String, Value>, key: &'static str) -> Result<Felt> {
    let raw = object.get(key).ok_or_else(|| LedgerError::MissingShareKeys {
        keys: vec![key.to_string()],
    })?;
    coerce_felt(raw).map_err(|source| LedgerError::InvalidShareField { key, source })
}

/// Coerce one JSON value into the field.
///
/// JSON integers of any width are accepted; fractional or exponent
/// forms are rejected.
fn coerce_felt(raw: &Value) -> std::result::Result<Felt, FieldError> {
    match raw {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                Ok(Felt::from(unsigned))
            } else if let Some(signed) = number.as_i64() {
                Ok(-Felt::from(signed.unsigned_abs()))
            } else {
                // Wider than 64 bits: arbitrary_precision keeps the
                // exact source text, which parses as a decimal literal.
                // Floats fail that parse.
                felt::from_text(&number.to_string())
            }
        }
        Value::String(text) => felt::from_text(text),
        other => Err(FieldError::Malformed(other.to_string())),
    }
}
