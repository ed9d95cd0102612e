// src/export/model.rs

use crate::models::employee::Employee;
use crate::models::entry::PointEntry;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Flat entry row shared by every export format.
#[derive(Serialize, Clone, Debug)]
pub struct EntryExport {
    pub id: i64,
    pub date: String,
    pub employee: String,
    pub login: String,
    pub category: String,
    pub points: u32,
    pub notes: String,
    #[serde(skip)]
    pub recorded_at: NaiveDateTime,
    #[serde(skip)]
    pub employee_id: i64,
}

impl EntryExport {
    pub fn new(entry: &PointEntry, employee: Option<&Employee>) -> Self {
        let (name, login) = match employee {
            Some(e) => (e.name.clone(), e.login.clone()),
            None => (format!("#{}", entry.employee_id), String::new()),
        };

        Self {
            id: entry.id,
            date: entry.timestamp_str(),
            employee: name,
            login,
            category: entry.category.clone(),
            points: entry.points,
            notes: entry.notes.clone(),
            recorded_at: entry.recorded_at,
            employee_id: entry.employee_id,
        }
    }
}

/// Column headers for the entry sheet, in field order.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["id", "date", "employee", "login", "category", "points", "notes"]
}
