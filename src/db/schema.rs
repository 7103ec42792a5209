//! SQL DDL for all brain tables.
//!
//! Defines the `recent_actions` ledger, the `documents` store and its
//! `documents_vec` (vec0) companion, the `state`, `sessions`, and
//! `command_log` bookkeeping tables, and `schema_meta`. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for brain's core tables.
const SCHEMA_SQL: &str = r#"
-- Loop-prevention ledger: one row per action fingerprint
CREATE TABLE IF NOT EXISTS recent_actions (
    fingerprint TEXT PRIMARY KEY,
    action_description TEXT NOT NULL,
    last_executed INTEGER NOT NULL,
    execution_count INTEGER NOT NULL DEFAULT 1,
    context TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_actions_last_executed ON recent_actions(last_executed);

-- Indexed documentation (one row per markdown file)
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    filename TEXT NOT NULL,
    path TEXT NOT NULL,
    size INTEGER NOT NULL,
    content TEXT NOT NULL,
    indexed_at TEXT NOT NULL
);

-- Key/value assistant state
CREATE TABLE IF NOT EXISTS state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Agent session bookkeeping
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    started_at TEXT NOT NULL,
    ended_at TEXT
);

-- Append-only CLI invocation log
CREATE TABLE IF NOT EXISTS command_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    command TEXT NOT NULL,
    args TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// vec0 virtual table must be created separately (sqlite-vec syntax).
const VEC_TABLE_SQL: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS documents_vec USING vec0(
    id TEXT PRIMARY KEY,
    embedding FLOAT[384]
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(VEC_TABLE_SQL)?;

    // Baseline metadata for a fresh database; existing values win.
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('embedding_model', 'all-MiniLM-L6-v2')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"recent_actions".to_string()));
        assert!(tables.contains(&"documents".to_string()));
        assert!(tables.contains(&"state".to_string()));
        assert!(tables.contains(&"sessions".to_string()));
        assert!(tables.contains(&"command_log".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));

        // Verify the vec0 virtual table is usable
        let version: String = conn
            .query_row("SELECT vec_version()", [], |r| r.get(0))
            .unwrap();
        assert!(!version.is_empty());
    }

    #[test]
    fn schema_is_idempotent() {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn ledger_enforces_fingerprint_uniqueness() {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO recent_actions (fingerprint, action_description, last_executed) \
             VALUES ('abc123abc123abc1', 'deploy', 1700000000)",
            [],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO recent_actions (fingerprint, action_description, last_executed) \
             VALUES ('abc123abc123abc1', 'deploy again', 1700000001)",
            [],
        );
        assert!(duplicate.is_err());
    }
}
