//! Bookkeeping tables: key/value state, sessions, and the command log.
//!
//! Thin write paths over three small tables. Nothing here participates in
//! the cooldown gate's decisions — these exist so an assistant can carry
//! simple facts across runs and so invocations leave an audit trail.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Set (or overwrite) a state value.
pub fn set_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO state (key, value, updated_at) VALUES (?1, ?2, ?3)",
        params![key, value, now],
    )?;
    Ok(())
}

/// Fetch a state value, if set.
pub fn get_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Open a new session row. Returns the session id (UUID v7, time-sortable).
pub fn start_session(conn: &Connection) -> Result<String> {
    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sessions (id, started_at) VALUES (?1, ?2)",
        params![id, now],
    )?;
    tracing::debug!(session = %id, "session started");
    Ok(id)
}

/// Mark a session as ended. Errors if the id is unknown.
pub fn end_session(conn: &Connection, id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    let rows = conn.execute(
        "UPDATE sessions SET ended_at = ?1 WHERE id = ?2",
        params![now, id],
    )?;
    anyhow::ensure!(rows > 0, "unknown session: {id}");
    Ok(())
}

/// Append one CLI invocation to the command log.
pub fn log_command(conn: &Connection, command: &str, args: &[String]) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    let args_json = serde_json::to_string(args)?;
    conn.execute(
        "INSERT INTO command_log (command, args, created_at) VALUES (?1, ?2, ?3)",
        params![command, args_json, now],
    )?;
    Ok(())
}
