use crate::core::period::format_timestamp;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One recorded unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointEntry {
    pub id: i64,
    pub employee_id: i64,
    pub recorded_at: NaiveDateTime, // ⇔ entries.recorded_at (TEXT "YYYY-MM-DD HH:MM:SS")
    pub category: String,           // ⇔ entries.category (refinery / location label)
    pub points: u32,                // ⇔ entries.points (CHECK >= 0)
    pub notes: String,              // ⇔ entries.notes (TEXT, default '')
    pub created_at: String,         // ⇔ entries.created_at (ISO8601)
}

impl PointEntry {
    /// Date portion used for every period comparison.
    pub fn date(&self) -> NaiveDate {
        self.recorded_at.date()
    }

    pub fn timestamp_str(&self) -> String {
        format_timestamp(&self.recorded_at)
    }
}

/// Fields supplied when recording a new entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub employee_id: i64,
    pub recorded_at: NaiveDateTime,
    pub category: String,
    pub points: u32,
    pub notes: String,
}

/// Partial update of an existing entry; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub recorded_at: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub points: Option<u32>,
    pub notes: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.recorded_at.is_none()
            && self.category.is_none()
            && self.points.is_none()
            && self.notes.is_none()
    }

    pub fn apply(&self, entry: &mut PointEntry) {
        if let Some(ts) = self.recorded_at {
            entry.recorded_at = ts;
        }
        if let Some(c) = &self.category {
            entry.category = c.clone();
        }
        if let Some(p) = self.points {
            entry.points = p;
        }
        if let Some(n) = &self.notes {
            entry.notes = n.clone();
        }
    }
}
