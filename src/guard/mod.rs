//! The cooldown engine — the decision logic that keeps an agent from
//! re-running the same action in a tight time window.
//!
//! Three pieces, leaf-first:
//!
//! - [`fingerprint`] — deterministic key derivation from the action text
//! - [`ledger`] — the durable `recent_actions` table, one row per fingerprint
//! - [`gate`] — the decide procedure: allow/block plus a human-readable reason
//!
//! The gate is the only writer to the ledger. Each decision runs inside a
//! single IMMEDIATE transaction so concurrent callers racing on the same
//! fingerprint serialize instead of both slipping through.

pub mod fingerprint;
pub mod gate;
pub mod ledger;

use serde::Serialize;
use thiserror::Error;

/// Outcome of a cooldown-gate decision.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    /// `true` if the action should execute now.
    pub allow: bool,
    /// Human-readable explanation (e.g. `"First execution"`,
    /// `"Loop detected: done 3min ago with same context"`).
    pub reason: String,
}

/// Errors surfaced by the cooldown gate.
///
/// There is deliberately no fallback decision on error: a storage failure
/// must reach the caller rather than be guessed away as allow or block.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The cooldown window was negative. Rejected before any storage access.
    #[error("cooldown window must not be negative (got {0} seconds)")]
    InvalidCooldown(i64),

    /// The backing store failed. Carries the failing operation and action
    /// text so the caller can diagnose which decision went wrong.
    #[error("action ledger {operation} failed for {fingerprint:?} ({action:?}): {source}")]
    Storage {
        operation: &'static str,
        fingerprint: String,
        action: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl GuardError {
    pub(crate) fn storage(
        operation: &'static str,
        fingerprint: &str,
        action: &str,
        source: rusqlite::Error,
    ) -> Self {
        Self::Storage {
            operation,
            fingerprint: fingerprint.to_string(),
            action: action.to_string(),
            source,
        }
    }
}
