use crate::core::period::{DateRange, format_timestamp, parse_timestamp};
use crate::errors::AppResult;
use crate::models::entry::{NewEntry, PointEntry};
use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const ENTRY_COLUMNS: &str = "id, employee_id, recorded_at, category, points, notes, created_at";

pub fn map_row(row: &Row) -> Result<PointEntry> {
    let raw: String = row.get("recorded_at")?;

    let recorded_at = parse_timestamp(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let points: i64 = row.get("points")?;

    Ok(PointEntry {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        recorded_at,
        category: row.get("category")?,
        points: u32::try_from(points.max(0)).unwrap_or(u32::MAX),
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_entry(conn: &Connection, entry: &NewEntry) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO entries (employee_id, recorded_at, category, points, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.employee_id,
            format_timestamp(&entry.recorded_at),
            entry.category,
            entry.points,
            entry.notes,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update an entry (all fields except id, employee and created_at)
pub fn update_entry(conn: &Connection, entry: &PointEntry) -> AppResult<()> {
    conn.execute(
        "UPDATE entries
         SET recorded_at = ?1, category = ?2, points = ?3, notes = ?4
         WHERE id = ?5",
        params![
            entry.timestamp_str(),
            entry.category,
            entry.points,
            entry.notes,
            entry.id,
        ],
    )?;
    Ok(())
}

pub fn load_entry(conn: &Connection, id: i64) -> AppResult<Option<PointEntry>> {
    let mut stmt = conn.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn delete_entry(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM entries WHERE id = ?1", [id])?)
}

/// Delete every entry, or every entry of one employee. Returns the row count.
pub fn delete_all_entries(conn: &Connection, employee_id: Option<i64>) -> AppResult<usize> {
    let n = match employee_id {
        Some(id) => conn.execute("DELETE FROM entries WHERE employee_id = ?1", [id])?,
        None => conn.execute("DELETE FROM entries", [])?,
    };
    Ok(n)
}

/// True when the employee already has an entry on `day`.
pub fn entry_exists_on(conn: &Connection, employee_id: i64, day: NaiveDate) -> AppResult<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM entries
         WHERE employee_id = ?1 AND date(recorded_at) = ?2
         LIMIT 1",
    )?;
    Ok(stmt.exists(params![employee_id, day.format("%Y-%m-%d").to_string()])?)
}

/// True when an identical entry (same employee, timestamp, points and
/// category) is already stored.
pub fn entry_exists_exact(conn: &Connection, entry: &NewEntry) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM entries
         WHERE employee_id = ?1 AND recorded_at = ?2 AND points = ?3 AND category = ?4
         LIMIT 1",
    )?;
    Ok(stmt.exists(params![
        entry.employee_id,
        format_timestamp(&entry.recorded_at),
        entry.points,
        entry.category
    ])?)
}

/// Load entries filtered by an inclusive date range and/or employee.
///
/// The range is compared on the date portion only (`date(recorded_at)`), so
/// an entry at `2025-08-25 11:59:50` falls inside a range ending `2025-08-25`.
/// Rows whose timestamp cannot be read are skipped with a warning.
pub fn load_entries(
    conn: &Connection,
    range: Option<DateRange>,
    employee_id: Option<i64>,
) -> AppResult<Vec<PointEntry>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(r) = range {
        clauses.push("date(recorded_at) BETWEEN ? AND ?");
        values.push(Value::Text(r.start.format("%Y-%m-%d").to_string()));
        values.push(Value::Text(r.end.format("%Y-%m-%d").to_string()));
    }

    if let Some(id) = employee_id {
        clauses.push("employee_id = ?");
        values.push(Value::Integer(id));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries {where_sql} ORDER BY recorded_at ASC, id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        match r {
            Ok(entry) => out.push(entry),
            Err(rusqlite::Error::FromSqlConversionFailure(_, _, e)) => {
                tracing::warn!(error = %e, "skipping entry with unreadable timestamp");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(out)
}
