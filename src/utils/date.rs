use crate::core::period::parse_day;
use crate::errors::AppResult;
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today.
pub fn reference_date(arg: Option<&str>) -> AppResult<NaiveDate> {
    match arg {
        Some(s) => parse_day(s),
        None => Ok(today()),
    }
}
