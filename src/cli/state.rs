//! CLI `state` and `session` commands — bookkeeping over the state tables.

use anyhow::Result;

use crate::config::BrainConfig;
use crate::state;

pub fn state_get(config: &BrainConfig, key: &str) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    match state::get_state(&conn, key)? {
        Some(value) => println!("{value}"),
        None => println!("(not set)"),
    }
    Ok(())
}

pub fn state_set(config: &BrainConfig, key: &str, value: &str) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    state::set_state(&conn, key, value)?;
    println!("{key} set");
    Ok(())
}

pub fn session_start(config: &BrainConfig) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    let id = state::start_session(&conn)?;
    println!("{id}");
    Ok(())
}

pub fn session_end(config: &BrainConfig, id: &str) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    state::end_session(&conn, id)?;
    println!("Session {id} ended");
    Ok(())
}
