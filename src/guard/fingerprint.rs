//! Content-addressed fingerprints for ledger keys.
//!
//! A fingerprint identifies "the same logical action": SHA-256 over the
//! action description, hex-encoded and truncated to 16 characters (64 bits).
//! The context string is deliberately not part of the key — it lives in the
//! ledger record and is compared at decision time, so the gate can tell a
//! blind retry from a legitimate repeat with new information. The hash is
//! used only for uniform, collision-resistant key derivation; 64 bits is
//! plenty at the record counts a single assistant accumulates.

use sha2::{Digest, Sha256};

/// Truncated hex length of a fingerprint.
pub const FINGERPRINT_LEN: usize = 16;

/// Derive the ledger key for an action description.
///
/// Deterministic and total: equal descriptions always produce equal keys,
/// and the empty string is a valid input.
pub fn fingerprint(action: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(action.as_bytes());
    let digest = hasher.finalize();
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}
