//! # pike-gateway
//!
//! The Pike admission daemon: HTTP surface, proof verification boundary
//! and admission orchestration.
//!
//! A submission carries an RLN spend share plus a proof reference. The
//! gateway parses and normalizes the share, has the external verifier
//! check the proof, and only then lets the share reach the nullifier
//! ledger for adjudication. A failed proof leaves no trace in the
//! ledger.
//!
//! ## Modules
//!
//! - [`config`] — TOML configuration with defaults and env override
//! - [`verifier`] — the proof verification boundary (external command or
//!   stub)
//! - [`admission`] — parse, verify, adjudicate; response assembly
//! - [`http`] — axum router wiring the service to the wire

pub mod admission;
pub mod config;
pub mod http;
pub mod verifier;

/// Error types for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The configured verifier command could not be resolved.
    #[error("verifier command not found: {0}")]
    VerifierNotFound(String),

    /// Spawning or collecting the verifier process failed.
    #[error("verifier execution failed: {0}")]
    VerifierExec(#[from] std::io::Error),

    /// The verifier exceeded its wall-clock budget.
    #[error("verifier timed out after {timeout_secs}s")]
    VerifierTimeout {
        /// The configured budget in seconds.
        timeout_secs: u64,
    },
}

/// Convenience result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
