//! Integration test crate for the Pike admission gateway.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise the full submission path (share parsing, proof
//! verification, ledger adjudication, wire shapes) across the workspace
//! crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p pike-integration-tests
//! ```
