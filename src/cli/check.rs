//! CLI `check` command — one cooldown-gate decision.
//!
//! Prints exactly one line: `ALLOW: <reason>` or `BLOCK: <reason>`. A block
//! exits with status 2 so shell callers can branch on the status instead of
//! parsing stdout. Errors never print a decision line — they propagate and
//! exit non-zero through main.

use anyhow::Result;
use chrono::Duration;

use crate::config::BrainConfig;
use crate::guard::gate;

/// Exit status returned when the gate blocks the action.
pub const BLOCK_EXIT_CODE: i32 = 2;

/// Run one decision and print it. Returns the process exit code.
pub fn check(
    config: &BrainConfig,
    action: &str,
    context: &str,
    cooldown_hours: Option<f64>,
) -> Result<i32> {
    let db_path = config.resolved_db_path();
    let mut conn = crate::db::open_database(&db_path)?;

    let hours = cooldown_hours.unwrap_or(config.guard.cooldown_hours);
    let cooldown = Duration::seconds((hours * 3600.0) as i64);

    let decision = gate::decide(&mut conn, action, context, cooldown)?;

    if decision.allow {
        println!("ALLOW: {}", decision.reason);
        Ok(0)
    } else {
        println!("BLOCK: {}", decision.reason);
        Ok(BLOCK_EXIT_CODE)
    }
}
