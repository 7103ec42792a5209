//! CLI `reset` command — delete all stored data after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::BrainConfig;

/// Delete all rows from every table after confirmation.
pub fn reset(config: &BrainConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete the action ledger, all indexed");
    println!("documents, state, sessions, and the command log.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let conn = crate::db::open_database(&db_path)?;

    conn.execute_batch(
        "DELETE FROM recent_actions;
         DELETE FROM documents_vec;
         DELETE FROM documents;
         DELETE FROM state;
         DELETE FROM sessions;
         DELETE FROM command_log;",
    )?;

    println!("All data deleted. Database reset complete.");
    Ok(())
}
