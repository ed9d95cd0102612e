use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::db::log::audit_lenient;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_all_entries, delete_entry, entry_exists_on, insert_entry, load_entry, update_entry,
};
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::entry::{EntryPatch, NewEntry, PointEntry};
use chrono::NaiveDateTime;

/// Business logic for recording, editing and removing point entries.
///
/// Every successful mutation drops all cached aggregates and leaves a row in
/// the audit log.
pub struct EntryLogic<'a> {
    pool: &'a DbPool,
    cache: &'a AggregateCache,
}

/// Parameters of `EntryLogic::add` after CLI parsing.
#[derive(Debug, Clone)]
pub struct AddRequest {
    pub recorded_at: NaiveDateTime,
    pub points: u32,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// Allow a second entry on the same day.
    pub force: bool,
}

/// Requested category, else the employee's default, else the configured one.
pub(crate) fn resolve_category(
    requested: Option<String>,
    employee: &Employee,
    cfg: &Config,
) -> String {
    requested
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .or_else(|| Some(employee.default_category.clone()).filter(|c| !c.is_empty()))
        .unwrap_or_else(|| cfg.default_category.clone())
}

impl<'a> EntryLogic<'a> {
    pub fn new(pool: &'a DbPool, cache: &'a AggregateCache) -> Self {
        Self { pool, cache }
    }

    pub fn add(
        &self,
        cfg: &Config,
        employee: &Employee,
        req: AddRequest,
    ) -> AppResult<PointEntry> {
        let day = req.recorded_at.date();

        if !req.force && entry_exists_on(&self.pool.conn, employee.id, day)? {
            return Err(AppError::DuplicateEntry {
                employee: employee.name.clone(),
                date: day.format("%Y-%m-%d").to_string(),
            });
        }

        let category = resolve_category(req.category, employee, cfg);

        let new = NewEntry {
            employee_id: employee.id,
            recorded_at: req.recorded_at,
            category,
            points: req.points,
            notes: req.notes.unwrap_or_default(),
        };

        let id = insert_entry(&self.pool.conn, &new)?;
        self.cache.clear();

        let entry = load_entry(&self.pool.conn, id)?.ok_or(AppError::EntryNotFound(id))?;

        audit_lenient(
            &self.pool.conn,
            "add",
            &format!("entry #{id}"),
            &format!(
                "{} +{} pts on {} ({})",
                employee.login,
                entry.points,
                entry.timestamp_str(),
                entry.category
            ),
        );
        tracing::info!(id, employee = %employee.login, points = entry.points, "entry recorded");

        Ok(entry)
    }

    pub fn edit(&self, id: i64, patch: &EntryPatch) -> AppResult<PointEntry> {
        let mut entry = load_entry(&self.pool.conn, id)?.ok_or(AppError::EntryNotFound(id))?;

        if patch.is_empty() {
            return Ok(entry);
        }

        let before = format!("{} pts @ {}", entry.points, entry.timestamp_str());
        patch.apply(&mut entry);
        update_entry(&self.pool.conn, &entry)?;
        self.cache.clear();

        audit_lenient(
            &self.pool.conn,
            "edit",
            &format!("entry #{id}"),
            &format!(
                "{before} -> {} pts @ {}",
                entry.points,
                entry.timestamp_str()
            ),
        );

        Ok(entry)
    }

    /// Remove one entry and return it.
    pub fn delete(&self, id: i64) -> AppResult<PointEntry> {
        let entry = load_entry(&self.pool.conn, id)?.ok_or(AppError::EntryNotFound(id))?;

        delete_entry(&self.pool.conn, id)?;
        self.cache.clear();

        audit_lenient(
            &self.pool.conn,
            "del",
            &format!("entry #{id}"),
            &format!("{} pts @ {}", entry.points, entry.timestamp_str()),
        );

        Ok(entry)
    }

    /// Remove every entry, or every entry of one employee.
    pub fn delete_all(&self, employee: Option<&Employee>) -> AppResult<usize> {
        let n = delete_all_entries(&self.pool.conn, employee.map(|e| e.id))?;
        self.cache.clear();

        let target = employee
            .map(|e| e.login.clone())
            .unwrap_or_else(|| "all".to_string());
        audit_lenient(
            &self.pool.conn,
            "del_all",
            &target,
            &format!("{n} entries deleted"),
        );
        tracing::info!(target = %target, deleted = n, "bulk delete");

        Ok(n)
    }
}
