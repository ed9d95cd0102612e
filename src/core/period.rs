//! Billing-cycle period calculator.
//!
//! A cycle runs from the 26th of one calendar month through the 25th of the
//! next. Each cycle is split into up to five weeks and keyed by the month in
//! which it closes (the cycle 26/03 → 25/04 is `04/YYYY`).
//!
//! Every function here is pure: the same date always maps to the same cycle,
//! week and month key.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CYCLE_START_DAY: u32 = 26;
pub const CYCLE_END_DAY: u32 = 25;
pub const WEEKS_PER_CYCLE: u32 = 5;

/// Canonical storage format for entry timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Which week a date lying exactly 7, 14, 21 or 28 days after the cycle
/// start belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekBoundary {
    /// Day 7 opens week 2: every week is a plain 7-day slice.
    #[default]
    StartsNewWeek,
    /// Day 7 still closes week 1, so week 1 spans 8 days (26th → 2nd).
    ClosesPreviousWeek,
}

impl WeekBoundary {
    fn week_for_offset(self, offset: i64) -> u32 {
        let raw = match self {
            WeekBoundary::StartsNewWeek => offset / 7 + 1,
            WeekBoundary::ClosesPreviousWeek => {
                if offset != 0 && offset % 7 == 0 {
                    offset / 7
                } else {
                    offset / 7 + 1
                }
            }
        };

        raw.clamp(1, WEEKS_PER_CYCLE as i64) as u32
    }

    /// Offset (in days from the cycle start) of the first day of `week`.
    fn first_offset(self, week: u32) -> i64 {
        let base = 7 * (week as i64 - 1);
        match self {
            WeekBoundary::StartsNewWeek => base,
            WeekBoundary::ClosesPreviousWeek if week == 1 => 0,
            WeekBoundary::ClosesPreviousWeek => base + 1,
        }
    }
}

/// Inclusive date interval used for every period query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Start of the cycle containing `date`: the 26th of the same month when
/// `date.day() >= 26`, otherwise the 26th of the previous month.
pub fn cycle_start(date: NaiveDate) -> NaiveDate {
    let anchor = if date.day() >= CYCLE_START_DAY {
        Some(date)
    } else {
        date.checked_sub_months(Months::new(1))
    };

    // Only None at the lower edge of chrono's calendar.
    anchor
        .and_then(|d| d.with_day(CYCLE_START_DAY))
        .unwrap_or(NaiveDate::MIN)
}

/// Week number (1..=5) of `date` inside its cycle.
pub fn week_number(date: NaiveDate, rule: WeekBoundary) -> u32 {
    let offset = (date - cycle_start(date)).num_days();
    rule.week_for_offset(offset)
}

/// Month key of the cycle containing `date`.
pub fn month_key(date: NaiveDate) -> MonthKey {
    Cycle::containing(date).month_key()
}

/// One 26th → 25th billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cycle {
    start: NaiveDate,
}

impl Cycle {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: cycle_start(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_months(Months::new(1))
            .and_then(|d| d.with_day(CYCLE_END_DAY))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end())
    }

    pub fn month_key(&self) -> MonthKey {
        let end = self.end();
        MonthKey {
            year: end.year(),
            month: end.month(),
        }
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.start - Duration::days(1))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.end() + Duration::days(1))
    }

    /// Bounds of `week` inside this cycle, or `None` when the cycle is too
    /// short to contain it (week 5 of a February cycle).
    pub fn week_bounds(&self, week: u32, rule: WeekBoundary) -> AppResult<Option<DateRange>> {
        if !(1..=WEEKS_PER_CYCLE).contains(&week) {
            return Err(AppError::InvalidWeek(week));
        }

        let cycle_end = self.end();
        let start = self.start + Duration::days(rule.first_offset(week));
        if start > cycle_end {
            return Ok(None);
        }

        // Week 5 absorbs every remaining day up to the 25th.
        let end = if week == WEEKS_PER_CYCLE {
            cycle_end
        } else {
            let next_start = self.start + Duration::days(rule.first_offset(week + 1));
            (next_start - Duration::days(1)).min(cycle_end)
        };

        Ok(Some(DateRange::new(start, end)))
    }

    /// Weeks that actually exist in this cycle, in order.
    pub fn weeks(&self, rule: WeekBoundary) -> Vec<WeekRef> {
        (1..=WEEKS_PER_CYCLE)
            .filter_map(|n| WeekRef::new(*self, n, rule).ok())
            .collect()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.month_key(), self.range())
    }
}

/// A concrete week inside a concrete cycle, with its resolved bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRef {
    pub cycle: Cycle,
    pub number: u32,
    pub range: DateRange,
}

impl WeekRef {
    /// Fails with `InvalidWeek` when `number` is outside 1..=5 or the week
    /// does not exist in `cycle`.
    pub fn new(cycle: Cycle, number: u32, rule: WeekBoundary) -> AppResult<Self> {
        let range = cycle
            .week_bounds(number, rule)?
            .ok_or(AppError::InvalidWeek(number))?;

        Ok(Self {
            cycle,
            number,
            range,
        })
    }

    pub fn containing(date: NaiveDate, rule: WeekBoundary) -> Self {
        let cycle = Cycle::containing(date);
        let number = week_number(date, rule);
        let range = cycle
            .week_bounds(number, rule)
            .ok()
            .flatten()
            .unwrap_or_else(|| DateRange::single(date));

        Self {
            cycle,
            number,
            range,
        }
    }

    /// The week before this one; week 1 rolls back to the last existing
    /// week of the previous cycle.
    pub fn previous(&self, rule: WeekBoundary) -> Self {
        if self.number > 1
            && let Ok(prev) = WeekRef::new(self.cycle, self.number - 1, rule)
        {
            return prev;
        }

        Self::containing(self.cycle.start() - Duration::days(1), rule)
    }
}

impl fmt::Display for WeekRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "week {} of {} ({})",
            self.number,
            self.cycle.month_key(),
            self.range
        )
    }
}

/// Cycle identifier displayed as `MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(month: u32, year: i32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::InvalidPeriod(format!("{month:02}/{year}")));
        }
        Ok(Self { year, month })
    }

    /// The cycle closing on the 25th of this month.
    pub fn cycle(&self) -> AppResult<Cycle> {
        NaiveDate::from_ymd_opt(self.year, self.month, CYCLE_END_DAY)
            .map(Cycle::containing)
            .ok_or_else(|| AppError::InvalidPeriod(self.to_string()))
    }

    pub fn bounds(&self) -> AppResult<DateRange> {
        Ok(self.cycle()?.range())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl FromStr for MonthKey {
    type Err = AppError;

    /// Accepts `MM/YYYY` and `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || AppError::InvalidPeriod(s.to_string());

        let (month, year) = if let Some((m, y)) = s.split_once('/') {
            (m, y)
        } else if let Some((y, m)) = s.split_once('-') {
            (m, y)
        } else {
            return Err(invalid());
        };

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        MonthKey::new(month, year)
    }
}

/// Parse an entry timestamp in any of the accepted formats. A date without
/// a time means midnight.
pub fn parse_timestamp(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Date portion of any accepted timestamp format.
pub fn parse_day(s: &str) -> AppResult<NaiveDate> {
    parse_timestamp(s).map(|dt| dt.date())
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}
