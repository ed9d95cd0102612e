use crate::config::GoalConfig;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result, params};

const MIGRATION_IMPORT_LEGACY: &str = "20250826_0001_import_legacy_tables";
const MIGRATION_NORMALIZE_TIMESTAMPS: &str = "20250826_0002_normalize_entry_timestamps";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    cols.collect()
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `employees` and `entries` tables with the modern schema.
fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            name             TEXT NOT NULL,
            login            TEXT NOT NULL UNIQUE,
            weekly_goal      INTEGER NOT NULL CHECK(weekly_goal >= 0),
            monthly_goal     INTEGER CHECK(monthly_goal IS NULL OR monthly_goal >= 0),
            default_category TEXT NOT NULL DEFAULT '',
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  INTEGER NOT NULL REFERENCES employees(id),
            recorded_at  TEXT NOT NULL,
            category     TEXT NOT NULL DEFAULT '',
            points       INTEGER NOT NULL CHECK(points >= 0),
            notes        TEXT NOT NULL DEFAULT '',
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_recorded_at ON entries(recorded_at);
        CREATE INDEX IF NOT EXISTS idx_entries_employee ON entries(employee_id, recorded_at);
        "#,
    )?;
    Ok(())
}

/// Import rows from the legacy `employee` / `entry` tables, whose schema
/// varied between releases (`name` vs `real_name`, optional `username`,
/// optional `weekly_goal`). The legacy tables are kept, renamed with a
/// `_legacy` suffix.
///
/// Tables without a goal column get `goals.weekly_default`, then the
/// per-login `goals.legacy_overrides`.
fn migrate_import_legacy_tables(conn: &Connection, goals: &GoalConfig) -> Result<()> {
    if migration_applied(conn, MIGRATION_IMPORT_LEGACY)? {
        return Ok(());
    }

    if !table_exists(conn, "employee")? || !table_exists(conn, "entry")? {
        return Ok(());
    }

    warning("Legacy tables detected: importing employees and entries...");

    let emp_cols = table_columns(conn, "employee")?;
    let has = |c: &str| emp_cols.iter().any(|x| x == c);

    let name_expr = match (has("real_name"), has("name")) {
        (true, true) => "COALESCE(real_name, name, 'emp' || id)",
        (true, false) => "COALESCE(real_name, 'emp' || id)",
        _ => "COALESCE(name, 'emp' || id)",
    };
    let login_expr = if has("username") {
        "COALESCE(username, 'emp' || id)"
    } else {
        "'emp' || id"
    };
    let category_expr = if has("default_refinery") {
        "COALESCE(default_refinery, '')"
    } else {
        "''"
    };
    let has_goal = has("weekly_goal");
    let goal_expr = if has_goal {
        "COALESCE(weekly_goal, ?1)"
    } else {
        "?1"
    };

    let tx = conn.unchecked_transaction()?;

    tx.execute(
        &format!(
            "INSERT INTO employees
                 (id, name, login, weekly_goal, monthly_goal, default_category, created_at)
             SELECT id, {name_expr}, {login_expr}, {goal_expr}, NULL, {category_expr},
                    datetime('now')
             FROM employee"
        ),
        [goals.weekly_default],
    )?;

    if !has_goal {
        for (login, goal) in &goals.legacy_overrides {
            tx.execute(
                "UPDATE employees SET weekly_goal = ?1, monthly_goal = ?2
                 WHERE login = ?3 COLLATE NOCASE AND id IN (SELECT id FROM employee)",
                params![goal.weekly, goal.monthly, login],
            )?;
        }
    }

    tx.execute_batch(
        r#"
        INSERT INTO entries (id, employee_id, recorded_at, category, points, notes, created_at)
        SELECT id, employee_id, date, COALESCE(refinery, ''), MAX(COALESCE(points, 0), 0),
               COALESCE(observations, ''), datetime('now')
        FROM entry
        WHERE employee_id IN (SELECT id FROM employees);

        ALTER TABLE employee RENAME TO employee_legacy;
        ALTER TABLE entry RENAME TO entry_legacy;
        "#,
    )?;

    mark_applied(
        &tx,
        MIGRATION_IMPORT_LEGACY,
        "Imported legacy employee/entry tables",
    )?;
    tx.commit()?;

    success(format!(
        "Migration applied: {} → legacy rows imported",
        MIGRATION_IMPORT_LEGACY
    ));
    Ok(())
}

/// Rewrite every stored timestamp to `YYYY-MM-DD HH:MM:SS`.
///
/// Older rows carry date-only values, `T` separators or minute precision;
/// once normalized, lexicographic and `date()` comparisons agree.
fn migrate_normalize_entry_timestamps(conn: &Connection) -> Result<()> {
    if migration_applied(conn, MIGRATION_NORMALIZE_TIMESTAMPS)? {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        UPDATE entries SET recorded_at = replace(trim(recorded_at), 'T', ' ')
        WHERE instr(recorded_at, 'T') > 0 OR recorded_at != trim(recorded_at);

        UPDATE entries SET recorded_at = recorded_at || ' 00:00:00'
        WHERE length(recorded_at) = 10;

        UPDATE entries SET recorded_at = recorded_at || ':00'
        WHERE length(recorded_at) = 16;

        UPDATE entries SET recorded_at = substr(recorded_at, 1, 19)
        WHERE length(recorded_at) > 19;
        "#,
    )?;

    mark_applied(
        &tx,
        MIGRATION_NORMALIZE_TIMESTAMPS,
        "Normalized entry timestamps to YYYY-MM-DD HH:MM:SS",
    )?;
    tx.commit()?;

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection, goals: &GoalConfig) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Create modern tables if missing
    let fresh = !table_exists(conn, "entries")?;
    create_tables(conn)?;
    if fresh {
        tracing::info!("created employees and entries tables");
    }

    // 3) Bring legacy data over, then normalize timestamps
    migrate_import_legacy_tables(conn, goals)
        .map_err(|e| AppError::Migration(format!("{MIGRATION_IMPORT_LEGACY}: {e}")))?;
    migrate_normalize_entry_timestamps(conn)
        .map_err(|e| AppError::Migration(format!("{MIGRATION_NORMALIZE_TIMESTAMPS}: {e}")))?;

    Ok(())
}
