//! Schema version bookkeeping.
//!
//! `schema_meta` carries two facts about a database: which schema version
//! wrote it, and which embedding model produced its stored vectors. The
//! version check refuses databases from a newer binary instead of misreading
//! them; the model identifier lets `doctor` flag a vector store that was
//! built with a different model than the one configured.

use anyhow::{bail, Result};
use rusqlite::{Connection, OptionalExtension};

/// Schema version this binary reads and writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Read the schema version recorded in `schema_meta`.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let value: String = conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )?;
    Ok(value.parse().unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [version.to_string()],
    )?;
    Ok(())
}

/// The embedding model that produced the stored vectors, if recorded.
pub fn get_embedding_model(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'embedding_model'",
        [],
        |row| row.get(0),
    )
    .optional()
}

/// Record the embedding model behind the stored vectors. Called after every
/// indexing run so `doctor` compares against what is actually in the store.
pub fn set_embedding_model(conn: &Connection, model: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('embedding_model', ?1)",
        [model],
    )?;
    Ok(())
}

/// Bring an older database up to [`CURRENT_SCHEMA_VERSION`], one version at
/// a time. A database written by a newer binary is refused outright.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let mut version = get_schema_version(conn)?;
    if version > CURRENT_SCHEMA_VERSION {
        bail!(
            "database schema v{version} is newer than this binary supports \
             (v{CURRENT_SCHEMA_VERSION}); upgrade brain"
        );
    }

    while version < CURRENT_SCHEMA_VERSION {
        let next = version + 1;
        tracing::info!(from = version, to = next, "migrating schema");
        // per-version upgrade steps dispatch on `next` here
        set_schema_version(conn, next)?;
        version = next;
    }

    Ok(())
}
