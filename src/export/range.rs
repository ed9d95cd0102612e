// src/export/range.rs

use crate::core::period::DateRange;
use crate::errors::{AppError, AppResult};
use chrono::{Months, NaiveDate};

fn invalid(r: &str, why: &str) -> AppError {
    AppError::InvalidPeriod(format!("{r}: {why}"))
}

/// First and last day of the period named by a single bound.
fn bound(r: &str, part: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match part.len() {
        // YYYY
        4 => {
            let y: i32 = part.parse().map_err(|_| invalid(r, "invalid year"))?;
            let first =
                NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(r, "invalid year"))?;
            let last =
                NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(r, "invalid year"))?;
            Ok((first, last))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{part}-01"), "%Y-%m-%d")
                .map_err(|_| invalid(r, "invalid month"))?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| invalid(r, "invalid month"))?;
            Ok((first, last))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(part, "%Y-%m-%d")
                .map_err(|_| invalid(r, "invalid date"))?;
            Ok((d, d))
        }
        _ => Err(invalid(r, "unsupported format")),
    }
}

/// Parse `--range`.
///
/// Accepts:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<DateRange> {
    let r = r.trim();

    let (start, end) = match r.split_once(':') {
        Some((a, b)) => {
            let (a, b) = (a.trim(), b.trim());
            if a.len() != b.len() {
                return Err(invalid(r, "start and end must have the same format"));
            }
            (bound(r, a)?.0, bound(r, b)?.1)
        }
        None => bound(r, r)?,
    };

    if start > end {
        return Err(invalid(r, "start is after end"));
    }
    Ok(DateRange::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_covers_leap_february() {
        let r = parse_range("2024-02").unwrap();
        assert_eq!(r, DateRange::new(d(2024, 2, 1), d(2024, 2, 29)));
    }

    #[test]
    fn interval_of_months() {
        let r = parse_range("2025-01:2025-03").unwrap();
        assert_eq!(r, DateRange::new(d(2025, 1, 1), d(2025, 3, 31)));
    }

    #[test]
    fn mixed_formats_rejected() {
        assert!(parse_range("2025:2025-03").is_err());
        assert!(parse_range("2025-03-10:2025-03-01").is_err());
        assert!(parse_range("25-03").is_err());
    }
}
