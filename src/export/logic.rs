// src/export/logic.rs

use crate::core::progress::{PeriodSelector, PeriodTotals, ProgressService};
use crate::db::log::audit_lenient;
use crate::db::pool::DbPool;
use crate::db::queries::load_entries;
use crate::errors::{AppError, AppResult};
use crate::export::bundle::{EmployeeReport, export_bundle};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::EntryExport;
use crate::export::ExportFormat;
use crate::export::xlsx::export_xlsx;
use crate::models::employee::Employee;
use crate::ui::messages::warning;
use std::collections::HashMap;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export entries selected by `period` (all entries when `None`),
    /// optionally limited to one employee.
    ///
    /// `file` must be an absolute path. An existing file is only replaced
    /// with `force` or after confirmation.
    pub fn export(
        service: &ProgressService<'_, DbPool>,
        format: ExportFormat,
        file: &str,
        period: Option<PeriodSelector>,
        employee: Option<&Employee>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let pool = service.store();
        let range = period.as_ref().map(|p| p.range()).transpose()?;
        let entries = load_entries(&pool.conn, range, employee.map(|e| e.id))?;

        if entries.is_empty() {
            warning("No entries found for the selected period.");
            return Ok(());
        }

        let employees = match employee {
            Some(e) => vec![e.clone()],
            None => service.employees()?,
        };
        let by_id: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();

        let rows: Vec<EntryExport> = entries
            .iter()
            .map(|e| EntryExport::new(e, by_id.get(&e.employee_id).copied()))
            .collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => {
                let totals = match range {
                    Some(r) => service.totals(r, employee.map(|e| e.id))?,
                    None => totals_of(&rows),
                };
                export_xlsx(&rows, &totals, path)?
            }
            ExportFormat::Zip => {
                let reports: Vec<EmployeeReport<'_>> = employees
                    .iter()
                    .map(|emp| EmployeeReport {
                        employee: emp,
                        entries: rows.iter().filter(|r| r.employee_id == emp.id).collect(),
                        goal: period.as_ref().map(|p| service.goal(p, emp)),
                    })
                    .collect();
                export_bundle(&reports, path)?;
            }
        }

        let scope = period
            .as_ref()
            .map(|p| p.label())
            .unwrap_or_else(|| "all".to_string());
        audit_lenient(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} entries ({scope}) -> {}", rows.len(), path.display()),
        );

        Ok(())
    }
}

/// Per-employee totals straight from the exported rows.
fn totals_of(rows: &[EntryExport]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for r in rows {
        *totals.by_employee.entry(r.employee.clone()).or_insert(0) += r.points as u64;
    }
    totals
}
