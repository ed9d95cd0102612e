use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, NewEmployee};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const EMPLOYEE_COLUMNS: &str =
    "id, name, login, weekly_goal, monthly_goal, default_category, created_at";

pub fn map_employee(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        login: row.get("login")?,
        weekly_goal: row.get("weekly_goal")?,
        monthly_goal: row.get("monthly_goal")?,
        default_category: row.get("default_category")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_employee(conn: &Connection, emp: &NewEmployee) -> AppResult<i64> {
    if load_employee_by_login(conn, &emp.login)?.is_some() {
        return Err(AppError::DuplicateEmployee(emp.login.clone()));
    }

    conn.execute(
        "INSERT INTO employees
             (name, login, weekly_goal, monthly_goal, default_category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            emp.name,
            emp.login,
            emp.weekly_goal,
            emp.monthly_goal,
            emp.default_category,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_goals(
    conn: &Connection,
    id: i64,
    weekly_goal: u32,
    monthly_goal: Option<u32>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE employees SET weekly_goal = ?1, monthly_goal = ?2 WHERE id = ?3",
        params![weekly_goal, monthly_goal, id],
    )?;
    Ok(())
}

pub fn load_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY name ASC, id ASC"
    ))?;

    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_employee(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"
    ))?;
    Ok(stmt.query_row([id], map_employee).optional()?)
}

/// Match a display name or a login, both case-insensitive.
pub fn load_employee_by_name(conn: &Connection, name: &str) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees
         WHERE name = ?1 COLLATE NOCASE OR login = ?1 COLLATE NOCASE
         ORDER BY id LIMIT 1"
    ))?;
    Ok(stmt.query_row([name], map_employee).optional()?)
}

pub fn load_employee_by_login(conn: &Connection, login: &str) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE login = ?1 COLLATE NOCASE"
    ))?;
    Ok(stmt.query_row([login], map_employee).optional()?)
}
