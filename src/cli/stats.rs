use anyhow::Result;

use crate::config::BrainConfig;

/// Display brain statistics in the terminal.
pub fn stats(config: &BrainConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let stats = crate::stats::brain_stats(&conn)?;

    println!("Brain Statistics");
    println!("{}", "=".repeat(40));
    println!("  Vector documents:    {}", stats.vector_docs);
    println!("  Tracked actions:     {}", stats.tracked_actions);
    println!("  Sessions:            {}", stats.sessions);
    println!("  State keys:          {}", stats.state_keys);
    println!("  Commands logged:     {}", stats.commands);

    Ok(())
}
