// src/export/bundle.rs

use crate::errors::AppResult;
use crate::export::xlsx::{ColumnWidths, total_format, write_entry_row, write_headers};
use crate::export::{EntryExport, notify_export_success};
use crate::models::employee::Employee;
use crate::ui::messages::info;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::FileOptions;

const REPORT_COLUMNS: [&str; 5] = ["id", "date", "category", "points", "notes"];

/// One employee's report: their entries and the goal for the period, if any.
pub(crate) struct EmployeeReport<'a> {
    pub employee: &'a Employee,
    pub entries: Vec<&'a EntryExport>,
    pub goal: Option<u64>,
}

/// Sheet names are limited to 31 chars and may not contain `[]:*?/\`.
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Points".to_string()
    } else {
        cleaned
    }
}

/// Build one report workbook in memory.
pub(crate) fn build_report(report: &EmployeeReport<'_>) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let ws = workbook
        .add_worksheet()
        .set_name(sheet_name(&report.employee.name))?;

    write_headers(ws, &REPORT_COLUMNS)?;
    let mut widths = ColumnWidths::new(&REPORT_COLUMNS);

    let mut row = 1u32;
    for entry in &report.entries {
        write_entry_row(ws, row, entry, &REPORT_COLUMNS, &mut widths)?;
        row += 1;
    }

    let total: u64 = report.entries.iter().map(|e| e.points as u64).sum();
    let fmt = total_format();
    ws.write_with_format(row, 0, "", &fmt)?;
    ws.write_with_format(row, 1, "Total", &fmt)?;
    ws.write_with_format(row, 2, "", &fmt)?;
    ws.write_with_format(row, 3, total as f64, &fmt)?;

    let remaining = match report.goal {
        Some(goal) => format!("Remaining: {}", goal.saturating_sub(total)),
        None => String::new(),
    };
    ws.write_with_format(row, 4, remaining.as_str(), &fmt)?;
    widths.observe(4, &remaining);

    widths.apply(ws)?;

    Ok(workbook.save_to_buffer()?)
}

/// Write a ZIP with one `<login>.xlsx` per employee that has entries.
pub(crate) fn export_bundle(reports: &[EmployeeReport<'_>], path: &Path) -> AppResult<usize> {
    info(format!("Exporting employee reports to ZIP: {}", path.display()));

    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut written = 0;
    for report in reports.iter().filter(|r| !r.entries.is_empty()) {
        let bytes = build_report(report)?;
        zip.start_file(format!("{}.xlsx", report.employee.login), options)?;
        zip.write_all(&bytes)?;
        written += 1;
    }

    zip.finish()?;

    notify_export_success("ZIP", path);
    Ok(written)
}
