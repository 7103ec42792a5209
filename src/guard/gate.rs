//! The decision procedure: should this action execute now, or is it a loop?
//!
//! Policy: "same action, same context, soon after" is a strong loop signal —
//! an agent retrying without new information — and gets blocked. "Same action,
//! different context" is a legitimate independent repeat and goes through,
//! as does anything outside the cooldown window. The context string is the
//! discriminator, not the action name alone, and the window slides from the
//! last allowed execution rather than a calendar bucket.

use chrono::Duration;
use rusqlite::{Connection, TransactionBehavior};

use super::fingerprint::fingerprint;
use super::{ledger, Decision, GuardError};

/// Default cooldown window: 4 hours.
pub const DEFAULT_COOLDOWN_HOURS: f64 = 4.0;

/// Max characters of prior context quoted in a "context changed" reason.
const CONTEXT_PREVIEW_CHARS: usize = 50;

/// Decide whether an action should execute now, reading the wall clock.
///
/// See [`decide_at`] for the actual procedure; tests inject `now` there.
pub fn decide(
    conn: &mut Connection,
    action: &str,
    context: &str,
    cooldown: Duration,
) -> Result<Decision, GuardError> {
    decide_at(conn, action, context, cooldown, chrono::Utc::now().timestamp())
}

/// Decide whether an action should execute at the given time (epoch seconds).
///
/// The full read-decide-write sequence runs inside one IMMEDIATE transaction,
/// so decisions for the same fingerprint from concurrent callers serialize.
/// An allowed decision inserts or updates the ledger record; a blocked one
/// leaves it untouched. There is no fallback decision on storage failure —
/// the error propagates with the action text and fingerprint attached.
pub fn decide_at(
    conn: &mut Connection,
    action: &str,
    context: &str,
    cooldown: Duration,
    now: i64,
) -> Result<Decision, GuardError> {
    let cooldown_secs = cooldown.num_seconds();
    if cooldown_secs < 0 {
        return Err(GuardError::InvalidCooldown(cooldown_secs));
    }

    let key = fingerprint(action);

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| GuardError::storage("begin", &key, action, e))?;

    let record = ledger::get(&tx, &key).map_err(|e| GuardError::storage("get", &key, action, e))?;

    let decision = match record {
        None => {
            ledger::insert(&tx, &key, action, now, context)
                .map_err(|e| GuardError::storage("insert", &key, action, e))?;
            Decision {
                allow: true,
                reason: "First execution".to_string(),
            }
        }
        Some(record) => {
            let mut elapsed = now - record.last_executed;
            if elapsed < 0 {
                // Stored timestamp is ahead of our clock. Treat the action as
                // just-executed so same-context repeats stay blocked.
                tracing::warn!(
                    fingerprint = %key,
                    last_executed = record.last_executed,
                    now,
                    "ledger timestamp is in the future; clamping elapsed to 0"
                );
                elapsed = 0;
            }
            // last_executed never rewinds, even under clock skew
            let write_ts = now.max(record.last_executed);

            if elapsed >= cooldown_secs {
                ledger::update(&tx, &key, write_ts, context)
                    .map_err(|e| GuardError::storage("update", &key, action, e))?;
                Decision {
                    allow: true,
                    reason: format!("Cooldown expired ({}h ago)", elapsed / 3600),
                }
            } else if context == record.context {
                Decision {
                    allow: false,
                    reason: format!(
                        "Loop detected: done {}min ago with same context",
                        elapsed / 60
                    ),
                }
            } else {
                ledger::update(&tx, &key, write_ts, context)
                    .map_err(|e| GuardError::storage("update", &key, action, e))?;
                Decision {
                    allow: true,
                    reason: format!(
                        "Context changed (was: {}...)",
                        context_preview(&record.context)
                    ),
                }
            }
        }
    };

    tx.commit()
        .map_err(|e| GuardError::storage("commit", &key, action, e))?;

    tracing::debug!(
        fingerprint = %key,
        allow = decision.allow,
        reason = %decision.reason,
        "cooldown gate decision"
    );

    Ok(decision)
}

/// First `CONTEXT_PREVIEW_CHARS` of a context string, cut on a char boundary.
fn context_preview(context: &str) -> &str {
    match context.char_indices().nth(CONTEXT_PREVIEW_CHARS) {
        Some((idx, _)) => &context[..idx],
        None => context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    const HOUR: i64 = 3600;
    const T0: i64 = 1_700_000_000;

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    fn window() -> Duration {
        Duration::hours(4)
    }

    #[test]
    fn first_call_allows_and_inserts() {
        let mut conn = test_db();

        let decision =
            decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0).unwrap();
        assert!(decision.allow);
        assert_eq!(decision.reason, "First execution");

        let key = fingerprint("Fix VelocityPanel");
        let record = ledger::get(&conn, &key).unwrap().unwrap();
        assert_eq!(record.action_description, "Fix VelocityPanel");
        assert_eq!(record.context, "cookie issue");
        assert_eq!(record.execution_count, 1);
        assert_eq!(record.last_executed, T0);
    }

    #[test]
    fn immediate_repeat_same_context_blocks() {
        let mut conn = test_db();

        let first = decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0).unwrap();
        assert!(first.allow);

        let second =
            decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0 + 180).unwrap();
        assert!(!second.allow);
        assert_eq!(second.reason, "Loop detected: done 3min ago with same context");
    }

    #[test]
    fn blocked_call_never_mutates_the_record() {
        let mut conn = test_db();
        decide_at(&mut conn, "restart worker", "queue stuck", window(), T0).unwrap();

        let key = fingerprint("restart worker");
        let before = ledger::get(&conn, &key).unwrap().unwrap();

        let blocked = decide_at(&mut conn, "restart worker", "queue stuck", window(), T0 + 600).unwrap();
        assert!(!blocked.allow);

        let after = ledger::get(&conn, &key).unwrap().unwrap();
        assert_eq!(after.last_executed, before.last_executed);
        assert_eq!(after.execution_count, before.execution_count);
        assert_eq!(after.context, before.context);
    }

    #[test]
    fn different_context_within_window_allows_and_notes_old_context() {
        let mut conn = test_db();
        decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0).unwrap();

        let decision =
            decide_at(&mut conn, "Fix VelocityPanel", "DNS issue", window(), T0 + 60).unwrap();
        assert!(decision.allow);
        assert_eq!(decision.reason, "Context changed (was: cookie issue...)");
    }

    #[test]
    fn context_change_mutates_the_single_record() {
        // Same action, new context — one record, its context overwritten.
        let mut conn = test_db();
        let first = decide_at(&mut conn, "A", "X", window(), T0).unwrap();
        assert!(first.allow);
        let second = decide_at(&mut conn, "A", "Y", window(), T0 + 60).unwrap();
        assert!(second.allow);

        let record = ledger::get(&conn, &fingerprint("A")).unwrap().unwrap();
        assert_eq!(record.context, "Y");
        assert_eq!(record.execution_count, 2);
        assert_eq!(record.last_executed, T0 + 60);
    }

    #[test]
    fn cooldown_expiry_allows_and_updates() {
        let mut conn = test_db();
        decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0).unwrap();

        let later = T0 + 5 * HOUR;
        let decision =
            decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), later).unwrap();
        assert!(decision.allow);
        assert_eq!(decision.reason, "Cooldown expired (5h ago)");

        let key = fingerprint("Fix VelocityPanel");
        let record = ledger::get(&conn, &key).unwrap().unwrap();
        assert_eq!(record.last_executed, later);
        assert_eq!(record.execution_count, 2);
    }

    #[test]
    fn exact_window_boundary_counts_as_expired() {
        let mut conn = test_db();
        decide_at(&mut conn, "sync mirrors", "", window(), T0).unwrap();

        let decision = decide_at(&mut conn, "sync mirrors", "", window(), T0 + 4 * HOUR).unwrap();
        assert!(decision.allow);
        assert!(decision.reason.starts_with("Cooldown expired"));
    }

    #[test]
    fn zero_window_only_blocks_the_same_instant() {
        let mut conn = test_db();
        decide_at(&mut conn, "poll inbox", "", Duration::zero(), T0).unwrap();

        // elapsed 0 >= window 0 — expired, allowed
        let same_instant = decide_at(&mut conn, "poll inbox", "", Duration::zero(), T0).unwrap();
        assert!(same_instant.allow);

        let next_second = decide_at(&mut conn, "poll inbox", "", Duration::zero(), T0 + 1).unwrap();
        assert!(next_second.allow);
    }

    #[test]
    fn negative_window_is_rejected_before_storage() {
        let mut conn = test_db();
        let err = decide_at(&mut conn, "anything", "", Duration::hours(-1), T0).unwrap_err();
        assert!(matches!(err, GuardError::InvalidCooldown(_)));

        // nothing was written
        let key = fingerprint("anything");
        assert!(ledger::get(&conn, &key).unwrap().is_none());
    }

    #[test]
    fn future_timestamp_clamps_to_just_executed() {
        let mut conn = test_db();
        decide_at(&mut conn, "rotate logs", "disk pressure", window(), T0 + HOUR).unwrap();

        // Our clock is behind the stored timestamp — treated as elapsed 0,
        // so the same-context repeat still blocks.
        let decision = decide_at(&mut conn, "rotate logs", "disk pressure", window(), T0).unwrap();
        assert!(!decision.allow);
        assert_eq!(decision.reason, "Loop detected: done 0min ago with same context");
    }

    #[test]
    fn last_executed_never_rewinds_under_clock_skew() {
        let mut conn = test_db();
        decide_at(&mut conn, "rotate logs", "disk pressure", window(), T0 + HOUR).unwrap();

        // Skewed clock plus a context change: allowed, but the stored
        // timestamp keeps the later value.
        let decision = decide_at(&mut conn, "rotate logs", "inode pressure", window(), T0).unwrap();
        assert!(decision.allow);

        let record = ledger::get(&conn, &fingerprint("rotate logs")).unwrap().unwrap();
        assert_eq!(record.last_executed, T0 + HOUR);
        assert_eq!(record.context, "inode pressure");
    }

    #[test]
    fn empty_action_description_is_permitted() {
        let mut conn = test_db();
        let decision = decide_at(&mut conn, "", "some context", window(), T0).unwrap();
        assert!(decision.allow);
        assert_eq!(decision.reason, "First execution");
    }

    #[test]
    fn long_context_preview_is_truncated_to_fifty_chars() {
        let mut conn = test_db();
        let long_context = "x".repeat(120);
        decide_at(&mut conn, "investigate outage", &long_context, window(), T0).unwrap();

        let decision =
            decide_at(&mut conn, "investigate outage", "fresh lead", window(), T0 + 60).unwrap();
        assert!(decision.allow);
        assert_eq!(
            decision.reason,
            format!("Context changed (was: {}...)", "x".repeat(50))
        );
    }

    #[test]
    fn context_preview_respects_char_boundaries() {
        let multibyte = "é".repeat(60);
        let preview = context_preview(&multibyte);
        assert_eq!(preview.chars().count(), 50);
    }

    #[test]
    fn storage_failure_surfaces_instead_of_guessing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brain.db");
        drop(db::open_database(&path).unwrap());

        // A read-only handle cannot take the write lock, so the decision
        // fails. It must come back as an error, not as allow or block.
        let mut conn = Connection::open_with_flags(
            &path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        )
        .unwrap();

        let err = decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0)
            .unwrap_err();
        match err {
            GuardError::Storage { operation, action, .. } => {
                assert_eq!(operation, "begin");
                assert_eq!(action, "Fix VelocityPanel");
            }
            other => panic!("expected a storage error, got {other}"),
        }

        // and nothing was decided or written
        let readable = db::open_database(&path).unwrap();
        assert!(ledger::get(&readable, &fingerprint("Fix VelocityPanel"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn velocity_panel_scenario() {
        let mut conn = test_db();

        let first = decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0).unwrap();
        assert!(first.allow);
        assert_eq!(first.reason, "First execution");

        let repeat =
            decide_at(&mut conn, "Fix VelocityPanel", "cookie issue", window(), T0 + 1).unwrap();
        assert!(!repeat.allow);
        assert!(repeat.reason.starts_with("Loop detected"));

        let new_context =
            decide_at(&mut conn, "Fix VelocityPanel", "DNS issue", window(), T0 + 2).unwrap();
        assert!(new_context.allow);
        assert!(new_context.reason.starts_with("Context changed"));
    }
}
