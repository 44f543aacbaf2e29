//! Nullifier ledger and spend adjudication.
//!
//! In-memory map from nullifier to the first share admitted for it. An
//! epoch's ledger fits in memory and restarts empty; durability is out
//! of scope here.
//!
//! ## Invariants
//!
//! - At most one entry per nullifier, written once, never mutated or
//!   removed.
//! - The whole decision sequence for a submission runs under a single
//!   lock acquisition, so two concurrent first spends of one nullifier
//!   cannot both be admitted.
//! - A slashed nullifier keeps its original entry; later conflicting
//!   shares recompute identical evidence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pike_field::{felt, recovery, Felt};

use crate::share::Share;
use crate::Result;

/// The first admitted share for a nullifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Ticket index the share spent.
    pub ticket_index: Felt,
    /// Evaluation point of the admitted share.
    pub x: Felt,
    /// Evaluation result of the admitted share.
    pub y: Felt,
}

impl LedgerEntry {
    fn from_share(share: &Share) -> Self {
        Self {
            ticket_index: share.ticket_index,
            x: share.x,
            y: share.y,
        }
    }
}

/// Evidence produced when a double spend reveals the identity secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashEvidence {
    /// Nullifier both shares spent.
    pub nullifier: Felt,
    /// Ticket index both shares spent.
    pub ticket_index: Felt,
    /// The interpolated identity secret `a0`.
    pub recovered_identity_secret: Felt,
    /// The two conflicting shares, previously admitted share first.
    pub shares: [Share; 2],
}

/// Outcome of adjudicating one verified share.
///
/// Every expected protocol situation is a variant here, not an error;
/// submitting a conflicting share is the adversary behaving exactly as
/// the protocol anticipates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjudication {
    /// First spend of this nullifier; the share was admitted.
    Accepted,
    /// Resubmission of exactly the admitted share.
    ReplaySameShare,
    /// Same nullifier under a different ticket index.
    RejectedTicketMismatch {
        /// The admitted entry the submission conflicts with.
        previous: LedgerEntry,
    },
    /// Same evaluation point as the admitted share, different y.
    RejectedInconsistentShare,
    /// Distinct evaluation point: the identity secret is recovered.
    Slashed(SlashEvidence),
}

/// Map from nullifier to admitted entry, guarded by one mutex.
pub struct NullifierLedger {
    entries: Mutex<HashMap<Felt, LedgerEntry>>,
}

impl NullifierLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Adjudicate one verified share against the ledger.
    ///
    /// Lookup, classification, evidence recovery and any insert happen
    /// under one lock acquisition.
    ///
    /// # Errors
    ///
    /// [`crate::LedgerError::Recovery`] if evidence interpolation fails.
    /// The x coordinates are compared before interpolating, so this does
    /// not occur for any input reachable through [`Share::from_json`].
    pub fn adjudicate(&self, share: &Share) -> Result<Adjudication> {
        let nullifier_hex = felt::to_hex(&share.nullifier);
        let mut entries = self.lock();

        let Some(previous) = entries.get(&share.nullifier).copied() else {
            entries.insert(share.nullifier, LedgerEntry::from_share(share));
            tracing::info!(
                nullifier = %nullifier_hex,
                ticket_index = %felt::to_hex(&share.ticket_index),
                "ledger: share admitted"
            );
            return Ok(Adjudication::Accepted);
        };

        if previous.ticket_index != share.ticket_index {
            tracing::warn!(
                nullifier = %nullifier_hex,
                admitted = %felt::to_hex(&previous.ticket_index),
                submitted = %felt::to_hex(&share.ticket_index),
                "ledger: nullifier replay with different ticket index"
            );
            return Ok(Adjudication::RejectedTicketMismatch { previous });
        }

        if previous.x == share.x {
            if previous.y == share.y {
                tracing::debug!(nullifier = %nullifier_hex, "ledger: identical share replayed");
                return Ok(Adjudication::ReplaySameShare);
            }
            tracing::warn!(
                nullifier = %nullifier_hex,
                x = %felt::to_hex(&share.x),
                "ledger: same x with inconsistent y"
            );
            return Ok(Adjudication::RejectedInconsistentShare);
        }

        let recovered =
            recovery::recover_identity_secret(previous.x, previous.y, share.x, share.y)?;
        tracing::warn!(
            nullifier = %nullifier_hex,
            ticket_index = %felt::to_hex(&share.ticket_index),
            "ledger: double spend detected, identity secret recovered"
        );
        Ok(Adjudication::Slashed(SlashEvidence {
            nullifier: share.nullifier,
            ticket_index: share.ticket_index,
            recovered_identity_secret: recovered,
            shares: [
                Share {
                    nullifier: share.nullifier,
                    ticket_index: previous.ticket_index,
                    x: previous.x,
                    y: previous.y,
                },
                *share,
            ],
        }))
    }

    /// Look up the admitted entry for a nullifier.
    pub fn get(&self, nullifier: &Felt) -> Option<LedgerEntry> {
        self.lock().get(nullifier).copied()
    }

    /// Clone of all admitted entries, for state introspection.
    pub fn snapshot(&self) -> HashMap<Felt, LedgerEntry> {
        self.lock().clone()
    }

    /// Number of admitted entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Felt, LedgerEntry>> {
        // A poisoned map is still consistent: every write is a single
        // insert of a fully built entry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NullifierLedger {
    fn default() -> Self {
        Self::new()
    }
}
