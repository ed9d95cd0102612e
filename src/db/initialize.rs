use crate::config::GoalConfig;
use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database with the default goal settings.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    init_db_with(conn, &GoalConfig::default())
}

/// Initialize the database; `goals` drives the goals given to employees
/// imported from legacy tables.
pub fn init_db_with(conn: &Connection, goals: &GoalConfig) -> AppResult<()> {
    run_pending_migrations(conn, goals)?;
    Ok(())
}
