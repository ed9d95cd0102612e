// src/import/logic.rs

use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::core::employees::EmployeeLogic;
use crate::core::entries::resolve_category;
use crate::db::employees::load_employee_by_name;
use crate::db::log::audit_lenient;
use crate::db::pool::DbPool;
use crate::db::queries::{entry_exists_exact, insert_entry};
use crate::errors::{AppError, AppResult};
use crate::import::sheet::{ParsedSheet, employee_name_from_file, read_sheet};
use crate::models::employee::Employee;
use crate::models::entry::NewEntry;
use crate::ui::messages::warning;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Provision employees named by a file but not found in the database.
    pub create_missing: bool,
    /// Read and count, write nothing.
    pub dry_run: bool,
}

/// Outcome of one folder import.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub files: usize,
    pub imported_files: usize,
    pub entries: usize,
    /// Rows already stored with the same timestamp, points and category.
    pub duplicates: usize,
    pub skipped_rows: usize,
    pub skipped_files: Vec<String>,
}

/// Imports per-employee workbooks (one file per employee, named after them).
pub struct ImportLogic<'a> {
    pool: &'a DbPool,
    cache: &'a AggregateCache,
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls"))
}

/// Workbooks under `dir`, recursively, in path order. Office lock files
/// (`~$name.xlsx`) are ignored.
fn collect_workbooks(dir: &Path, out: &mut Vec<PathBuf>) -> AppResult<()> {
    for item in fs::read_dir(dir)? {
        let path = item?.path();
        if path.is_dir() {
            collect_workbooks(&path, out)?;
        } else if is_workbook(&path)
            && !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("~$"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Login derived from a display name: `Carla Dias` → `carla.dias`.
fn login_for(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(".")
}

impl<'a> ImportLogic<'a> {
    pub fn new(pool: &'a DbPool, cache: &'a AggregateCache) -> Self {
        Self { pool, cache }
    }

    pub fn import_folder(
        &self,
        cfg: &Config,
        folder: &Path,
        opts: ImportOptions,
    ) -> AppResult<ImportReport> {
        if !folder.is_dir() {
            return Err(AppError::Import(format!(
                "not a directory: {}",
                folder.display()
            )));
        }

        let mut files = Vec::new();
        collect_workbooks(folder, &mut files)?;
        files.sort();

        let mut report = ImportReport {
            files: files.len(),
            ..ImportReport::default()
        };

        for path in &files {
            let label = path
                .strip_prefix(folder)
                .unwrap_or(path)
                .display()
                .to_string();

            match self.import_file(cfg, path, opts, &mut report) {
                Ok(true) => report.imported_files += 1,
                Ok(false) => report.skipped_files.push(label),
                Err(e) => {
                    warning(format!("Skipping {label}: {e}"));
                    report.skipped_files.push(label);
                }
            }
        }

        if !opts.dry_run && report.entries > 0 {
            self.cache.clear();
            audit_lenient(
                &self.pool.conn,
                "import",
                &folder.display().to_string(),
                &format!(
                    "{} entries from {} files ({} duplicates)",
                    report.entries, report.imported_files, report.duplicates
                ),
            );
        }
        tracing::info!(
            files = report.files,
            entries = report.entries,
            duplicates = report.duplicates,
            dry_run = opts.dry_run,
            "folder import finished"
        );

        Ok(report)
    }

    /// `Ok(false)` when the file names no known employee.
    fn import_file(
        &self,
        cfg: &Config,
        path: &Path,
        opts: ImportOptions,
        report: &mut ImportReport,
    ) -> AppResult<bool> {
        let Some(name) = employee_name_from_file(path) else {
            return Ok(false);
        };

        let sheet = read_sheet(path)?;
        report.skipped_rows += sheet.skipped;

        let employee = match load_employee_by_name(&self.pool.conn, &name)? {
            Some(e) => Some(e),
            None if opts.create_missing && !opts.dry_run => Some(EmployeeLogic::add(
                self.pool,
                cfg,
                &name,
                &login_for(&name),
                None,
                None,
                None,
            )?),
            None if opts.create_missing => None,
            None => {
                warning(format!(
                    "No employee named '{name}' ({}); use --create-missing to add it.",
                    path.display()
                ));
                return Ok(false);
            }
        };

        match employee {
            Some(emp) if !opts.dry_run => self.store_rows(cfg, &emp, sheet, report)?,
            Some(emp) => self.count_rows(cfg, &emp, sheet, report)?,
            // Dry run for an employee that would be created: nothing stored yet.
            None => report.entries += sheet.rows.len(),
        }

        Ok(true)
    }

    fn new_entries(cfg: &Config, emp: &Employee, sheet: ParsedSheet) -> Vec<NewEntry> {
        sheet
            .rows
            .into_iter()
            .map(|row| NewEntry {
                employee_id: emp.id,
                recorded_at: row.recorded_at,
                category: resolve_category(row.category, emp, cfg),
                points: row.points,
                notes: row.notes.unwrap_or_default(),
            })
            .collect()
    }

    /// One transaction per file; a failing row leaves the file unimported.
    fn store_rows(
        &self,
        cfg: &Config,
        emp: &Employee,
        sheet: ParsedSheet,
        report: &mut ImportReport,
    ) -> AppResult<()> {
        let tx = self.pool.conn.unchecked_transaction()?;
        let (mut added, mut dupes) = (0, 0);

        for entry in Self::new_entries(cfg, emp, sheet) {
            if entry_exists_exact(&tx, &entry)? {
                dupes += 1;
            } else {
                insert_entry(&tx, &entry)?;
                added += 1;
            }
        }

        tx.commit()?;
        report.entries += added;
        report.duplicates += dupes;
        Ok(())
    }

    fn count_rows(
        &self,
        cfg: &Config,
        emp: &Employee,
        sheet: ParsedSheet,
        report: &mut ImportReport,
    ) -> AppResult<()> {
        for entry in Self::new_entries(cfg, emp, sheet) {
            if entry_exists_exact(&self.pool.conn, &entry)? {
                report.duplicates += 1;
            } else {
                report.entries += 1;
            }
        }
        Ok(())
    }
}
