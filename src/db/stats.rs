use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::format_points;
use rusqlite::OptionalExtension;
use std::fs;

/// Summary counters shown by `db --info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStats {
    pub file_size: u64,
    pub employees: i64,
    pub entries: i64,
    pub total_points: i64,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
}

pub fn collect(pool: &DbPool, db_path: &str) -> AppResult<DbStats> {
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    let employees: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;

    let (entries, total_points): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(points), 0) FROM entries",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (first_day, last_day): (Option<String>, Option<String>) = pool
        .conn
        .query_row(
            "SELECT MIN(date(recorded_at)), MAX(date(recorded_at)) FROM entries",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    Ok(DbStats {
        file_size,
        employees,
        entries,
        total_points,
        first_day,
        last_day,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let stats = collect(pool, db_path)?;
    let file_mb = (stats.file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Employees:{} {}{}{}",
        CYAN, RESET, GREEN, stats.employees, RESET
    );
    println!(
        "{}• Entries:{} {}{}{} ({} points)",
        CYAN,
        RESET,
        GREEN,
        stats.entries,
        RESET,
        format_points(stats.total_points.max(0) as u64)
    );

    let dash = || format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", stats.first_day.clone().unwrap_or_else(dash));
    println!("    to:   {}", stats.last_day.clone().unwrap_or_else(dash));

    println!();
    Ok(())
}
