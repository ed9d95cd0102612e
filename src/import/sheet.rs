// src/import/sheet.rs

use crate::core::period::parse_timestamp;
use crate::errors::{AppError, AppResult};
use crate::export::excel_date::from_excel_serial;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;

const DATE_KEYS: [&str; 3] = ["data", "date", "dia"];
const POINTS_KEYS: [&str; 5] = ["ponto", "point", "valor", "value", "total"];
const CATEGORY_KEYS: [&str; 4] = ["refinaria", "refinery", "categoria", "category"];
const NOTES_KEYS: [&str; 3] = ["observ", "note", "nota"];

/// Month names that per-employee workbooks carry after the employee name
/// (`Ana Souza Setembro.xlsx`).
const MONTH_SUFFIXES: [&str; 13] = [
    "janeiro",
    "fevereiro",
    "março",
    "marco",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// One usable row of a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub recorded_at: NaiveDateTime,
    pub points: u32,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub rows: Vec<SheetRow>,
    /// Rows without a readable date or with no positive points.
    pub skipped: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ColumnMap {
    date: Option<usize>,
    points: Option<usize>,
    category: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    /// First header matching each keyword list wins.
    fn from_header(cells: &[Data]) -> Self {
        let mut map = ColumnMap::default();
        let matches = |name: &str, keys: &[&str]| keys.iter().any(|k| name.contains(k));

        for (i, cell) in cells.iter().enumerate() {
            let name = cell_text(cell).to_lowercase();
            if name.is_empty() {
                continue;
            }

            if map.date.is_none() && matches(&name, &DATE_KEYS) {
                map.date = Some(i);
            } else if map.points.is_none() && matches(&name, &POINTS_KEYS) {
                map.points = Some(i);
            } else if map.category.is_none() && matches(&name, &CATEGORY_KEYS) {
                map.category = Some(i);
            } else if map.notes.is_none() && matches(&name, &NOTES_KEYS) {
                map.notes = Some(i);
            }
        }
        map
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => from_excel_serial(dt.as_f64()),
        Data::Float(f) => from_excel_serial(*f),
        Data::Int(n) => from_excel_serial(*n as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_timestamp(s).ok().or_else(|| {
            NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        }),
        _ => None,
    }
}

fn cell_points(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(n) => Some(*n as f64),
        Data::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn cell_label(row: &[Data], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(cell_text)
        .filter(|s| !s.is_empty())
}

/// Employee display name encoded in a workbook file name, without the
/// extension and a trailing month name.
pub fn employee_name_from_file(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?.trim();
    let mut words: Vec<&str> = stem.split_whitespace().collect();

    if words.len() > 1
        && let Some(last) = words.last()
        && MONTH_SUFFIXES.contains(&last.to_lowercase().as_str())
    {
        words.pop();
    }

    let name = words.join(" ");
    if name.is_empty() { None } else { Some(name) }
}

/// Read the first worksheet of `path`. The first row is the header; date
/// and points columns are required.
pub fn read_sheet(path: &Path) -> AppResult<ParsedSheet> {
    let import_err = |msg: String| AppError::Import(format!("{}: {msg}", path.display()));

    let mut workbook = open_workbook_auto(path).map_err(|e| import_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| import_err("workbook has no worksheet".into()))?
        .map_err(|e| import_err(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| import_err("worksheet is empty".into()))?;

    let columns = ColumnMap::from_header(header);
    let (Some(date_col), Some(points_col)) = (columns.date, columns.points) else {
        return Err(import_err("no date or points column in the header".into()));
    };

    let mut sheet = ParsedSheet::default();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let recorded_at = row.get(date_col).and_then(cell_datetime);
        let points = row.get(points_col).and_then(cell_points).map(f64::round);

        match (recorded_at, points) {
            (Some(recorded_at), Some(p)) if p > 0.0 && p <= u32::MAX as f64 => {
                sheet.rows.push(SheetRow {
                    recorded_at,
                    points: p as u32,
                    category: cell_label(row, columns.category),
                    notes: cell_label(row, columns.notes),
                });
            }
            _ => {
                tracing::debug!(file = %path.display(), row = i + 2, "skipping row");
                sheet.skipped += 1;
            }
        }
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn header_keywords_pick_columns() {
        let header = [s("Data"), s("Refinaria"), s("Pontos"), s("Observações")];
        assert_eq!(
            ColumnMap::from_header(&header),
            ColumnMap {
                date: Some(0),
                points: Some(2),
                category: Some(1),
                notes: Some(3),
            }
        );
    }

    #[test]
    fn dates_from_text_and_serials() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        let midnight = d.and_time(NaiveTime::MIN);

        assert_eq!(cell_datetime(&s("2025-09-02")), Some(midnight));
        assert_eq!(cell_datetime(&s("02/09/2025")), Some(midnight));
        assert_eq!(cell_datetime(&Data::Float(45902.0)), Some(midnight));
        assert_eq!(cell_datetime(&s("soon")), None);
    }

    #[test]
    fn points_accept_decimal_comma() {
        assert_eq!(cell_points(&s("12,5")), Some(12.5));
        assert_eq!(cell_points(&Data::Int(40)), Some(40.0));
        assert_eq!(cell_points(&Data::Empty), None);
    }

    #[test]
    fn employee_name_drops_month_suffix() {
        let name = |p: &str| employee_name_from_file(Path::new(p));
        assert_eq!(name("/x/Ana Souza Setembro.xlsx").as_deref(), Some("Ana Souza"));
        assert_eq!(name("/x/Bruno Lima.xls").as_deref(), Some("Bruno Lima"));
        assert_eq!(name("/x/Abril.xlsx").as_deref(), Some("Abril"));
    }
}
