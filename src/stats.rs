//! Aggregate counters across the whole brain database.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

/// Snapshot of table sizes, rendered by `brain stats`.
#[derive(Debug, Serialize)]
pub struct BrainStats {
    /// Documents with an embedding in the vector store.
    pub vector_docs: u64,
    /// Fingerprints tracked by the loop-prevention ledger.
    pub tracked_actions: u64,
    pub sessions: u64,
    pub state_keys: u64,
    pub commands: u64,
}

/// Count rows in each table.
pub fn brain_stats(conn: &Connection) -> Result<BrainStats> {
    Ok(BrainStats {
        vector_docs: crate::knowledge::search::document_count(conn)?,
        tracked_actions: count(conn, "recent_actions")?,
        sessions: count(conn, "sessions")?,
        state_keys: count(conn, "state")?,
        commands: count(conn, "command_log")?,
    })
}

fn count(conn: &Connection, table: &str) -> Result<u64> {
    // table names come from the fixed list above, never from input
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(n as u64)
}
