//! Admission pipeline: parse, verify, adjudicate, respond.
//!
//! One logical task per submission. Proof verification runs before the
//! ledger is touched and never under its lock, so slow verifier runs do
//! not serialize admissions. A failed or errored verification leaves no
//! ledger trace; a later resubmission with a passing proof is a fresh
//! first spend.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use base64::Engine;
use pike_field::felt;
use pike_ledger::ledger::{Adjudication, LedgerEntry, NullifierLedger, SlashEvidence};
use pike_ledger::share::Share;
use serde_json::{json, Value};

use crate::verifier::{ProofVerifier, Verdict};

/// The proof file a submission points at.
enum ProofSource {
    /// Path to a proof already on disk.
    OnDisk(PathBuf),
    /// Inline proof staged into a temp file for the verifier run; the
    /// file is removed when this value drops.
    Staged(tempfile::NamedTempFile),
}

impl ProofSource {
    fn path(&self) -> &Path {
        match self {
            ProofSource::OnDisk(path) => path,
            ProofSource::Staged(file) => file.path(),
        }
    }
}

/// The admission service: owns the nullifier ledger and the verifier
/// handle, and turns submissions into wire responses.
pub struct AdmissionService {
    ledger: NullifierLedger,
    verifier: Arc<dyn ProofVerifier>,
}

impl AdmissionService {
    /// Create a service with an empty ledger.
    pub fn new(verifier: Arc<dyn ProofVerifier>) -> Self {
        Self {
            ledger: NullifierLedger::new(),
            verifier,
        }
    }

    /// Read-only handle to the ledger.
    pub fn ledger(&self) -> &NullifierLedger {
        &self.ledger
    }

    /// Process one submission body end to end.
    ///
    /// Always produces a response; every failure is local to this
    /// submission.
    pub async fn submit(&self, body: &[u8]) -> (StatusCode, Value) {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(err) => return bad_request(format!("invalid json: {err}")),
        };

        let share = match Share::from_json(&payload) {
            Ok(share) => share,
            Err(err) => return bad_request(format!("invalid share: {err}")),
        };

        let proof = match extract_proof(&payload) {
            Ok(proof) => proof,
            Err(response) => return response,
        };

        match self.verifier.verify(proof.path()).await {
            Ok(Verdict::Verified) => {}
            Ok(Verdict::Failed { output }) => {
                tracing::info!(
                    nullifier = %felt::to_hex(&share.nullifier),
                    "submission rejected: proof failed verification"
                );
                return (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "proof verify failed", "verifier_output": output }),
                );
            }
            Err(err) => {
                tracing::error!(error = %err, "verifier infrastructure failure");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("verification error: {err}") }),
                );
            }
        }
        // A staged temp proof can go as soon as the verifier has run.
        drop(proof);

        match self.ledger.adjudicate(&share) {
            Ok(outcome) => respond(&share, outcome),
            Err(err) => {
                tracing::error!(error = %err, "ledger adjudication failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("adjudication error: {err}") }),
                )
            }
        }
    }

    /// Snapshot of admitted entries, shaped for the state endpoint.
    pub fn state(&self) -> Value {
        let entries: serde_json::Map<String, Value> = self
            .ledger
            .snapshot()
            .iter()
            .map(|(nullifier, entry)| (felt::to_hex(nullifier), entry_json(entry)))
            .collect();
        json!({ "active_spent": entries })
    }
}

fn respond(share: &Share, outcome: Adjudication) -> (StatusCode, Value) {
    match outcome {
        Adjudication::Accepted => (
            StatusCode::OK,
            json!({
                "status": "accepted",
                "nullifier": felt::to_hex(&share.nullifier),
                "ticket_index": felt::to_hex(&share.ticket_index),
                "x": felt::to_hex(&share.x),
            }),
        ),
        Adjudication::ReplaySameShare => (
            StatusCode::OK,
            json!({
                "status": "replay_same_share",
                "nullifier": felt::to_hex(&share.nullifier),
            }),
        ),
        Adjudication::RejectedTicketMismatch { previous } => (
            StatusCode::CONFLICT,
            json!({
                "error": "nullifier replay with different ticket_index",
                "previous": entry_json(&previous),
            }),
        ),
        Adjudication::RejectedInconsistentShare => (
            StatusCode::CONFLICT,
            json!({ "error": "same x, inconsistent y" }),
        ),
        Adjudication::Slashed(evidence) => (StatusCode::CONFLICT, slash_json(&evidence)),
    }
}

fn entry_json(entry: &LedgerEntry) -> Value {
    json!({
        "ticket_index": felt::to_hex(&entry.ticket_index),
        "x": felt::to_hex(&entry.x),
        "y": felt::to_hex(&entry.y),
    })
}

fn slash_json(evidence: &SlashEvidence) -> Value {
    let shares: Vec<Value> = evidence
        .shares
        .iter()
        .map(|share| json!({ "x": felt::to_hex(&share.x), "y": felt::to_hex(&share.y) }))
        .collect();
    json!({
        "status": "slashed",
        "slash": true,
        "nullifier": felt::to_hex(&evidence.nullifier),
        "ticket_index": felt::to_hex(&evidence.ticket_index),
        "recovered_identity_secret": felt::to_hex(&evidence.recovered_identity_secret),
        "shares": shares,
    })
}

fn extract_proof(payload: &Value) -> std::result::Result<ProofSource, (StatusCode, Value)> {
    // JSON null counts as absent for both reference keys.
    let path_ref = payload.get("proof_path").filter(|value| !value.is_null());
    let inline_ref = payload.get("proof_b64").filter(|value| !value.is_null());

    if let Some(raw) = path_ref {
        let Some(text) = raw.as_str() else {
            return Err(bad_request("proof_path must be a string".to_string()));
        };
        let path = PathBuf::from(text);
        if !path.exists() {
            return Err(bad_request(format!("proof_path not found: {text}")));
        }
        return Ok(ProofSource::OnDisk(path));
    }

    let Some(raw) = inline_ref else {
        return Err(bad_request("provide proof_path or proof_b64".to_string()));
    };
    let Some(encoded) = raw.as_str() else {
        return Err(bad_request("proof_b64 must be a string".to_string()));
    };
    let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(err) => return Err(bad_request(format!("invalid proof_b64: {err}"))),
    };
    match stage_proof(&bytes) {
        Ok(file) => Ok(ProofSource::Staged(file)),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": format!("verification error: {err}") }),
        )),
    }
}

/// Write an inline proof to a temp file for the verifier run.
fn stage_proof(bytes: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("proof_")
        .suffix(".json")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

fn bad_request(message: String) -> (StatusCode, Value) {
    (StatusCode::BAD_REQUEST, json!({ "error": message }))
}
