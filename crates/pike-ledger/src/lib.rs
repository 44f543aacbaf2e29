//! # pike-ledger
//!
//! Spent-ticket tracking and double-spend adjudication for Pike.
//!
//! The ledger maps each seen nullifier to the first share admitted for
//! it. Identical replays, ticket reuse under a different index,
//! inconsistent shares and slashable double spends are classified here.
//! Proof verification happens upstream; only verified shares reach the
//! ledger.
//!
//! ## Modules
//!
//! - [`share`] — untrusted share payload parsing
//! - [`ledger`] — the nullifier ledger and its adjudication outcomes

pub mod ledger;
pub mod share;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The share payload is not a JSON object.
    #[error("share must be a JSON object")]
    NotAnObject,

    /// The share payload lacks one or more required keys.
    #[error("missing share keys: {}", .keys.join(", "))]
    MissingShareKeys {
        /// The absent keys, sorted.
        keys: Vec<String>,
    },

    /// A share field could not be normalized into the field.
    #[error("invalid value for {key:?}: {source}")]
    InvalidShareField {
        /// The offending key.
        key: &'static str,
        /// The underlying parse failure.
        #[source]
        source: pike_field::FieldError,
    },

    /// Secret recovery failed while building slash evidence.
    #[error("slash recovery failed: {0}")]
    Recovery(#[from] pike_field::FieldError),
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
