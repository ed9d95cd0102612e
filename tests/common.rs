#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use refpoints::core::period::DateRange;
use refpoints::core::store::PointStore;
use refpoints::errors::AppResult;
use refpoints::models::employee::Employee;
use refpoints::models::entry::PointEntry;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("refpoints")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_refpoints.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_refpoints_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Init the DB and register two employees: `ana` (goal 2375) and `bruno` (goal 2675).
pub fn init_db_with_employees(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rti()
        .args([
            "--db",
            db_path,
            "--test",
            "employee",
            "add",
            "Ana Souza",
            "ana",
            "--weekly-goal",
            "2375",
            "--category",
            "REDUC",
        ])
        .assert()
        .success();

    rti()
        .args([
            "--db",
            db_path,
            "--test",
            "employee",
            "add",
            "Bruno Lima",
            "bruno",
            "--weekly-goal",
            "2675",
        ])
        .assert()
        .success();
}

/// Record points through the CLI.
pub fn add_points(db_path: &str, login: &str, points: u32, at: &str) {
    rti()
        .args([
            "--db",
            db_path,
            "--test",
            "add",
            login,
            &points.to_string(),
            "--at",
            at,
        ])
        .assert()
        .success();
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn dt(s: &str) -> NaiveDateTime {
    refpoints::core::period::parse_timestamp(s).unwrap()
}

pub fn employee(id: i64, name: &str, weekly_goal: u32) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        login: name.to_lowercase(),
        weekly_goal,
        monthly_goal: None,
        default_category: String::new(),
        created_at: String::new(),
    }
}

pub fn entry(id: i64, employee_id: i64, at: &str, points: u32) -> PointEntry {
    PointEntry {
        id,
        employee_id,
        recorded_at: dt(at),
        category: "REDUC".to_string(),
        points,
        notes: String::new(),
        created_at: String::new(),
    }
}

/// In-memory store; counts `entries_between` calls to observe caching.
#[derive(Default)]
pub struct MemStore {
    pub employees: Vec<Employee>,
    pub entries: Vec<PointEntry>,
    pub queries: std::cell::Cell<usize>,
}

impl MemStore {
    pub fn new(employees: Vec<Employee>, entries: Vec<PointEntry>) -> Self {
        Self {
            employees,
            entries,
            queries: std::cell::Cell::new(0),
        }
    }
}

impl PointStore for MemStore {
    fn employees(&self) -> AppResult<Vec<Employee>> {
        Ok(self.employees.clone())
    }

    fn employee(&self, id: i64) -> AppResult<Option<Employee>> {
        Ok(self.employees.iter().find(|e| e.id == id).cloned())
    }

    fn employee_by_login(&self, login: &str) -> AppResult<Option<Employee>> {
        Ok(self
            .employees
            .iter()
            .find(|e| e.login.eq_ignore_ascii_case(login))
            .cloned())
    }

    fn entries_between(
        &self,
        range: DateRange,
        employee_id: Option<i64>,
    ) -> AppResult<Vec<PointEntry>> {
        self.queries.set(self.queries.get() + 1);
        Ok(self
            .entries
            .iter()
            .filter(|e| range.contains(e.date()))
            .filter(|e| employee_id.is_none_or(|id| e.employee_id == id))
            .cloned()
            .collect())
    }
}
