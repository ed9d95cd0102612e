// src/export/xlsx.rs

use crate::core::progress::PeriodTotals;
use crate::errors::AppResult;
use crate::export::excel_date::{DATETIME_NUM_FORMAT, to_excel_serial};
use crate::export::fs_utils::path_str;
use crate::export::model::get_headers;
use crate::export::{EntryExport, notify_export_success};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const HEADER_BG: u32 = 0x2F75B5;
const BAND_BG: u32 = 0xEAF3FB;
const TOTAL_BG: u32 = 0xC5D9F1;

pub(crate) fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(HEADER_BG))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

pub(crate) fn total_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(TOTAL_BG))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn cell_format(band: bool) -> Format {
    let bg = if band { BAND_BG } else { 0xFFFFFF };
    Format::new()
        .set_background_color(Color::RGB(bg))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

/// Tracks the widest value seen per column.
pub(crate) struct ColumnWidths(Vec<usize>);

impl ColumnWidths {
    pub(crate) fn new(headers: &[&str]) -> Self {
        Self(headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect())
    }

    pub(crate) fn observe(&mut self, col: usize, text: &str) {
        if let Some(w) = self.0.get_mut(col) {
            *w = (*w).max(UnicodeWidthStr::width(text));
        }
    }

    pub(crate) fn apply(&self, ws: &mut Worksheet) -> AppResult<()> {
        for (c, w) in self.0.iter().enumerate() {
            ws.set_column_width(c as u16, *w as f64 + 2.0)?;
        }
        Ok(())
    }
}

pub(crate) fn write_headers(ws: &mut Worksheet, headers: &[&str]) -> AppResult<()> {
    let fmt = header_format();
    for (col, header) in headers.iter().enumerate() {
        ws.write_with_format(0, col as u16, *header, &fmt)?;
    }
    ws.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Write one banded entry row. `columns` picks which fields to emit, by
/// header name, so per-employee sheets can drop the employee columns.
pub(crate) fn write_entry_row(
    ws: &mut Worksheet,
    row: u32,
    entry: &EntryExport,
    columns: &[&str],
    widths: &mut ColumnWidths,
) -> AppResult<()> {
    let base = cell_format(row % 2 == 1);
    let right = base.clone().set_align(FormatAlign::Right);

    for (col, name) in columns.iter().enumerate() {
        let c = col as u16;
        match *name {
            "id" => {
                ws.write_with_format(row, c, entry.id as f64, &right)?;
                widths.observe(col, &entry.id.to_string());
            }
            "date" => {
                let fmt = base.clone().set_num_format(DATETIME_NUM_FORMAT);
                ws.write_with_format(row, c, to_excel_serial(&entry.recorded_at), &fmt)?;
                widths.observe(col, DATETIME_NUM_FORMAT);
            }
            "points" => {
                ws.write_with_format(row, c, entry.points as f64, &right)?;
                widths.observe(col, &entry.points.to_string());
            }
            other => {
                let text = match other {
                    "employee" => entry.employee.as_str(),
                    "login" => entry.login.as_str(),
                    "category" => entry.category.as_str(),
                    "notes" => entry.notes.as_str(),
                    _ => "",
                };
                ws.write_with_format(row, c, text, &base)?;
                widths.observe(col, text);
            }
        }
    }
    Ok(())
}

fn write_totals_sheet(ws: &mut Worksheet, totals: &PeriodTotals) -> AppResult<()> {
    let headers = ["employee", "points"];
    write_headers(ws, &headers)?;
    let mut widths = ColumnWidths::new(&headers);

    let mut row = 1u32;
    for (name, points) in totals.iter() {
        let fmt = cell_format(row % 2 == 1);
        ws.write_with_format(row, 0, name.as_str(), &fmt)?;
        ws.write_with_format(row, 1, *points as f64, &fmt)?;
        widths.observe(0, name);
        widths.observe(1, &points.to_string());
        row += 1;
    }

    let total = total_format();
    ws.write_with_format(row, 0, "Total", &total)?;
    ws.write_with_format(row, 1, totals.total() as f64, &total)?;

    widths.apply(ws)
}

/// Export XLSX: an `Entries` sheet plus a `Totals` sheet per employee.
pub(crate) fn export_xlsx(
    entries: &[EntryExport],
    totals: &PeriodTotals,
    path: &Path,
) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();

    let headers = get_headers();
    {
        let ws = workbook.add_worksheet().set_name("Entries")?;
        write_headers(ws, &headers)?;

        let mut widths = ColumnWidths::new(&headers);
        for (i, entry) in entries.iter().enumerate() {
            write_entry_row(ws, (i + 1) as u32, entry, &headers, &mut widths)?;
        }
        widths.apply(ws)?;
    }

    {
        let ws = workbook.add_worksheet().set_name("Totals")?;
        write_totals_sheet(ws, totals)?;
    }

    workbook.save(path_str(path)?)?;

    notify_export_success("XLSX", path);
    Ok(())
}
