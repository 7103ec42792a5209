//! The action ledger — durable per-fingerprint execution records.
//!
//! One row in `recent_actions` per fingerprint. The gate is the only caller;
//! all three operations take the gate's open transaction so a decision's
//! read-then-write never interleaves with another writer on the same key.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

/// One row of the `recent_actions` table.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    /// Content-addressed key; unique per action description.
    pub fingerprint: String,
    /// Original action text, stored once at first insert. Informational only.
    pub action_description: String,
    /// Epoch seconds of the most recent allowed execution.
    pub last_executed: i64,
    /// Number of allowed executions recorded for this fingerprint.
    pub execution_count: u32,
    /// Context string from the most recent allowed execution.
    pub context: String,
}

/// Fetch the record for a fingerprint, if one exists.
pub fn get(conn: &Connection, fingerprint: &str) -> rusqlite::Result<Option<ActionRecord>> {
    conn.query_row(
        "SELECT fingerprint, action_description, last_executed, execution_count, context \
         FROM recent_actions WHERE fingerprint = ?1",
        params![fingerprint],
        |row| {
            Ok(ActionRecord {
                fingerprint: row.get(0)?,
                action_description: row.get(1)?,
                last_executed: row.get(2)?,
                execution_count: row.get(3)?,
                context: row.get(4)?,
            })
        },
    )
    .optional()
}

/// Insert a first-observation record. Fails if the fingerprint already exists —
/// the gate only calls this after `get` returned none, inside the same
/// transaction.
pub fn insert(
    conn: &Connection,
    fingerprint: &str,
    action_description: &str,
    now: i64,
    context: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO recent_actions (fingerprint, action_description, last_executed, execution_count, context) \
         VALUES (?1, ?2, ?3, 1, ?4)",
        params![fingerprint, action_description, now, context],
    )?;
    Ok(())
}

/// Record a repeat execution: bump `last_executed`, increment the count, and
/// overwrite the context. Fails if the fingerprint is absent.
pub fn update(
    conn: &Connection,
    fingerprint: &str,
    now: i64,
    context: &str,
) -> rusqlite::Result<()> {
    let rows = conn.execute(
        "UPDATE recent_actions \
         SET last_executed = ?1, execution_count = execution_count + 1, context = ?2 \
         WHERE fingerprint = ?3",
        params![now, context, fingerprint],
    )?;
    if rows == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}
