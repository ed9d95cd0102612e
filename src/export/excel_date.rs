// src/export/excel_date.rs

use chrono::{DateTime, NaiveDateTime};

/// Excel serial of 1970-01-01 in the 1900 date system.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

pub(crate) const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Convert a naive date-time to an Excel serial number (days since 1899-12-30).
pub(crate) fn to_excel_serial(dt: &NaiveDateTime) -> f64 {
    UNIX_EPOCH_SERIAL + dt.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}

/// Inverse of `to_excel_serial`, rounded to the second. Serials before
/// 1900-01-01 are rejected.
pub(crate) fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let secs = ((serial - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).round() as i64;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}
